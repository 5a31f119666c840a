//! Request execution.
//!
//! A request moves through a fixed sequence: parse the arguments, resolve an
//! engine, consult the ignore file, discover configuration, merge options and
//! finally format or check. The missing-engine and ignored-file exits both
//! hand the input back unchanged.

use std::path::{Component, Path, PathBuf};

use prettierd_config::EnvSnapshot;
use prettierd_engine::{
    Engine, EngineLoader, EngineOptions, EngineResolver, FileInfoQuery, ModuleLocator,
};
use serde_json::Value;
use tracing::debug;

use crate::args::{Task, tokenize};
use crate::discovery::{resolve_against, resolve_file_config};
use crate::errors::RequestError;
use crate::options::CliOptions;
use crate::precedence::merge;

const EXECUTION_TARGET: &str = "prettierd::execution";

/// Key carrying the absolute target path in merged options.
pub const FILEPATH_KEY: &str = "filepath";

/// Inputs for one request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Directory relative paths are resolved against.
    pub cwd: &'a Path,
    /// Raw argument vector.
    pub args: &'a [String],
    /// Environment snapshot for the request.
    pub env: &'a EnvSnapshot,
    /// Text buffer to format or check.
    pub text: &'a str,
}

/// Runs one request to completion.
///
/// Returns the formatted text, the input unchanged when no engine is
/// available or the file is ignored, or an empty string for a passing check.
///
/// # Errors
///
/// Returns [`RequestError::Usage`] for malformed arguments before any I/O,
/// [`RequestError::InvalidFormatting`] when a check fails, and
/// [`RequestError::Engine`] for resolution or engine failures.
pub fn run<L, D>(
    resolver: &EngineResolver<L, D>,
    context: &RequestContext<'_>,
) -> Result<String, RequestError>
where
    L: ModuleLocator,
    D: EngineLoader,
{
    let tokens = tokenize(context.args)?;
    let options = CliOptions::from_tokens(tokens.passthrough.as_slice());
    let file_path = absolutize(context.cwd, &tokens.target);

    debug!(
        target: EXECUTION_TARGET,
        file = %file_path.display(),
        task = ?tokens.task,
        no_color = tokens.arguments.no_color,
        "parsed request"
    );

    let start_dir = file_path.parent().unwrap_or(context.cwd);
    let Some(resolved) = resolver.resolve(context.env, context.cwd, start_dir)? else {
        debug!(target: EXECUTION_TARGET, "no engine available, returning input");
        return Ok(context.text.to_owned());
    };
    let engine = resolved.engine();

    let ignore_query = FileInfoQuery {
        ignore_path: resolve_against(context.cwd, &tokens.arguments.ignore_path),
    };
    if engine.file_info(&file_path, &ignore_query)?.ignored {
        debug!(
            target: EXECUTION_TARGET,
            file = %file_path.display(),
            "file is ignored, returning input"
        );
        return Ok(context.text.to_owned());
    }

    let discovered = resolve_file_config(
        context.env,
        engine,
        context.cwd,
        &file_path,
        &options.config,
        options.editorconfig,
    )?;
    let mut merged = merge(options.config_precedence, options.engine_options(), discovered);
    merged.insert(
        FILEPATH_KEY.to_owned(),
        Value::String(file_path.to_string_lossy().into_owned()),
    );

    dispatch(engine, tokens.task, context.text, &merged, file_path)
}

fn dispatch(
    engine: &dyn Engine,
    task: Task,
    text: &str,
    options: &EngineOptions,
    file_path: PathBuf,
) -> Result<String, RequestError> {
    match task {
        Task::Format => Ok(engine.format(text, options)?),
        Task::Check => {
            if engine.check(text, options)? {
                Ok(String::new())
            } else {
                Err(RequestError::InvalidFormatting { path: file_path })
            }
        }
    }
}

/// Joins `target` onto `cwd` and folds `.` and `..` components lexically.
fn absolutize(cwd: &Path, target: &str) -> PathBuf {
    let mut normalised = PathBuf::new();
    for component in cwd.join(target).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalised.pop();
            }
            other => normalised.push(other.as_os_str()),
        }
    }
    normalised
}
