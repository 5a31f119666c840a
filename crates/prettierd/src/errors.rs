//! Error types surfaced by request handling.

use std::path::PathBuf;
use std::sync::Arc;

use prettierd_engine::EngineError;
use thiserror::Error;

/// Malformed argument vectors, rejected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// No positional file argument was given.
    #[error("no file was given; pass the path of the file being formatted")]
    MissingFile,
    /// More than one positional argument was given.
    #[error("only one file may be given, got '{first}' and '{second}'")]
    MultiplePositionals {
        /// The positional accepted as the target file.
        first: String,
        /// The extra positional that was rejected.
        second: String,
    },
    /// A flag that takes a value was the last argument.
    #[error("{flag} requires a value")]
    MissingValue {
        /// The flag missing its value.
        flag: &'static str,
    },
}

/// Failures reported to the caller of a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The argument vector was malformed.
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// Engine resolution or an engine call failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The check task found the file is not formatted.
    #[error("{} is not formatted", path.display())]
    InvalidFormatting {
        /// Absolute path of the checked file.
        path: PathBuf,
    },
    /// The invocation payload matched neither call shape.
    #[error("malformed invocation payload: {0}")]
    MalformedInvocation(#[source] Arc<serde_json::Error>),
}

impl RequestError {
    /// Exit status for the binary.
    ///
    /// Usage errors return status 2; every other failure returns status 1.
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::MalformedInvocation(_) => 2,
            Self::Engine(_) | Self::InvalidFormatting { .. } => 1,
        }
    }
}
