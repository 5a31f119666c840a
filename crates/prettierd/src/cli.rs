//! Single-request command line front end.
//!
//! Reads the text buffer from stdin, runs one request through an
//! [`InvocationAdapter`] and writes the result to stdout. Failures go to
//! stderr with exit status 2 for usage errors and 1 otherwise.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use prettierd_config::Config;
use prettierd_engine::{
    EngineLoader, EngineResolver, ModuleLocator, NodeBridgeLoader, NodeLocator,
};

use crate::errors::RequestError;
use crate::invocation::{Invocation, InvocationAdapter};

/// Builds the adapter the binary uses, backed by the Node bridge.
#[must_use]
pub fn node_adapter(config: &Config) -> InvocationAdapter<NodeLocator, NodeBridgeLoader> {
    let global = config
        .global_engine_path()
        .map(|path| path.as_std_path().to_path_buf());
    InvocationAdapter::new(EngineResolver::new(
        NodeLocator::new(config.node_binary(), global),
        NodeBridgeLoader::new(config.node_binary()),
    ))
}

/// Runs one request and returns the process exit status.
///
/// `args` excludes the program name.
pub fn run<L, D, I, R, W, E>(
    adapter: &InvocationAdapter<L, D>,
    cwd: PathBuf,
    args: I,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode
where
    L: ModuleLocator,
    D: EngineLoader,
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let arguments = match args
        .into_iter()
        .map(OsString::into_string)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(arguments) => arguments,
        Err(argument) => {
            let _ = writeln!(
                stderr,
                "argument is not valid UTF-8: {}",
                argument.to_string_lossy()
            );
            return ExitCode::from(2);
        }
    };

    let mut text = String::new();
    if let Err(error) = stdin.read_to_string(&mut text) {
        let _ = writeln!(stderr, "failed to read stdin: {error}");
        return ExitCode::FAILURE;
    }

    let invocation = Invocation {
        cwd,
        args: arguments,
        client_env: BTreeMap::new(),
        text,
    };
    let mut outcome: Option<Result<String, RequestError>> = None;
    adapter.invoke(invocation, |result| outcome = Some(result));

    match outcome {
        Some(Ok(output)) => {
            let written = stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush());
            match written {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => {
                    let _ = writeln!(stderr, "failed to write output: {error}");
                    ExitCode::FAILURE
                }
            }
        }
        Some(Err(error)) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::from(error.exit_status())
        }
        None => ExitCode::FAILURE,
    }
}
