//! Short-lived `node` processes for the bridge.
//!
//! Every engine call spawns one helper, writes the request to stdin as a
//! single JSONL line, reads the response from stdout, and waits for exit. The
//! helper runs with the request's environment snapshot rather than the
//! daemon's. No timeout is enforced.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use prettierd_config::EnvSnapshot;
use tracing::debug;

use crate::error::EngineError;
use crate::protocol::{BridgeRequest, BridgeResponse};

/// Tracing target for bridge process operations.
const BRIDGE_TARGET: &str = "prettierd_engine::bridge";

/// Helper script evaluated by `node -e`.
const BRIDGE_SCRIPT: &str = include_str!("bridge.js");

/// Resolves a package from an optional directory and prints the entry point.
const RESOLVE_SCRIPT: &str = concat!(
    "const [pkg, dir] = process.argv.slice(1);",
    "process.stdout.write(require.resolve(pkg, dir ? { paths: [dir] } : undefined));",
);

/// How to launch `node`.
#[derive(Debug, Clone)]
pub(crate) struct NodeCommand<'a> {
    pub(crate) program: &'a OsStr,
    pub(crate) pnp_shim: Option<&'a Path>,
    pub(crate) env: &'a EnvSnapshot,
}

impl NodeCommand<'_> {
    fn command(&self) -> Command {
        let mut command = Command::new(self.program);
        command.env_clear();
        command.envs(self.env.iter());
        if let Some(shim) = self.pnp_shim {
            command.arg("-r").arg(shim);
        }
        command
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Runs `require.resolve` for `package`, scoped to `start_dir` when given.
pub(crate) fn resolve_module(
    node: &NodeCommand<'_>,
    package: &str,
    start_dir: Option<&Path>,
) -> Result<String, EngineError> {
    let mut command = node.command();
    command.arg("-e").arg(RESOLVE_SCRIPT).arg(package);
    if let Some(dir) = start_dir {
        command.arg(dir);
    }

    debug!(
        target: BRIDGE_TARGET,
        package,
        start_dir = ?start_dir,
        "resolving engine module"
    );

    let output = command.output().map_err(|source| EngineError::SpawnFailed {
        program: node.program_name(),
        source: Arc::new(source),
    })?;

    let from = start_dir.map_or_else(
        || String::from("global install"),
        |dir| dir.display().to_string(),
    );
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EngineError::not_found(package, from, first_line(&stderr)));
    }

    let resolved = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if resolved.is_empty() {
        return Err(EngineError::not_found(package, from, "resolver printed nothing"));
    }
    Ok(resolved)
}

/// Spawns the helper, exchanges one request, and returns the response.
pub(crate) fn exchange(
    node: &NodeCommand<'_>,
    request: &BridgeRequest,
) -> Result<BridgeResponse, EngineError> {
    let mut command = node.command();
    command
        .arg("-e")
        .arg(BRIDGE_SCRIPT)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(
        target: BRIDGE_TARGET,
        operation = request.operation().name(),
        module = %request.module().display(),
        "spawning bridge process"
    );

    let mut child = command.spawn().map_err(|source| EngineError::SpawnFailed {
        program: node.program_name(),
        source: Arc::new(source),
    })?;

    // The child is always drained and reaped once spawned. A non-zero exit
    // outranks pipe failures because it carries the helper's stderr.
    let stderr = child.stderr.take();
    let line = match (child.stdin.take(), child.stdout.take()) {
        (Some(stdin), Some(stdout)) => {
            write_request(stdin, request).and_then(|()| read_response(stdout))
        }
        _ => Err(EngineError::io("capturing bridge pipes", missing_pipe())),
    };
    let diagnostics = drain_stderr(stderr);
    wait_for_exit(node, &mut child, &diagnostics)?;
    parse_response(&line?)
}

/// Writes the serialised request and closes stdin.
fn write_request(mut stdin: impl Write, request: &BridgeRequest) -> Result<(), EngineError> {
    let json = serde_json::to_string(request).map_err(EngineError::SerializeRequest)?;

    debug!(
        target: BRIDGE_TARGET,
        request_bytes = json.len(),
        "writing request to bridge stdin"
    );

    stdin
        .write_all(json.as_bytes())
        .and_then(|()| stdin.write_all(b"\n"))
        .and_then(|()| stdin.flush())
        .map_err(|error| EngineError::io("writing the engine request", error))
    // Stdin is dropped here, closing the pipe to signal no more input.
}

/// Reads a single JSONL line from stdout.
fn read_response(stdout: impl Read) -> Result<String, EngineError> {
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    let bytes_read = reader
        .read_line(&mut line)
        .map_err(|error| EngineError::io("reading the engine response", error))?;

    debug!(target: BRIDGE_TARGET, bytes_read, "read bridge response");

    if bytes_read == 0 {
        return Err(EngineError::DeserializeResponse {
            message: String::from("bridge produced no output on stdout"),
            source: None,
        });
    }
    Ok(line)
}

/// Drains stderr so the child cannot block on a full pipe.
fn drain_stderr(stderr: Option<impl Read>) -> String {
    let Some(reader) = stderr else {
        return String::new();
    };
    let mut buffer = String::new();
    if BufReader::new(reader).read_to_string(&mut buffer).is_ok() && !buffer.is_empty() {
        debug!(target: BRIDGE_TARGET, stderr = %buffer.trim(), "bridge stderr output");
    }
    buffer
}

fn wait_for_exit(
    node: &NodeCommand<'_>,
    child: &mut Child,
    diagnostics: &str,
) -> Result<(), EngineError> {
    let status = child
        .wait()
        .map_err(|error| EngineError::io("waiting for the bridge to exit", error))?;
    if status.success() {
        return Ok(());
    }
    Err(EngineError::NonZeroExit {
        program: node.program_name(),
        status: status.code().unwrap_or(-1),
        stderr: diagnostics.trim().to_owned(),
    })
}

fn parse_response(line: &str) -> Result<BridgeResponse, EngineError> {
    serde_json::from_str(line.trim()).map_err(|error| EngineError::DeserializeResponse {
        message: format!("bridge produced invalid JSON: {error}"),
        source: Some(error),
    })
}

fn missing_pipe() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe was not captured")
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("resolution failed")
        .to_owned()
}
