//! Domain errors raised while locating, loading, or calling an engine.
//!
//! I/O errors are wrapped in `Arc` to satisfy the `result_large_err` Clippy
//! lint and keep the error cloneable into test worlds.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Module resolution could not find the engine package.
    #[error("cannot resolve '{package}' from {from}: {message}")]
    NotFound {
        /// Package that was looked up.
        package: String,
        /// Directory the lookup started from, or a description of the global
        /// search.
        from: String,
        /// Resolver output explaining the failure.
        message: String,
    },

    /// The helper process could not be spawned.
    #[error("failed to start '{program}': {source}")]
    SpawnFailed {
        /// Executable that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The helper process exited unsuccessfully.
    #[error("'{program}' exited with status {status}: {stderr}")]
    NonZeroExit {
        /// Executable that was launched.
        program: String,
        /// Process exit status, `-1` when killed by a signal.
        status: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// An I/O error occurred while talking to the helper process.
    #[error("I/O error while {action}: {source}")]
    Io {
        /// What the bridge was doing when the error occurred.
        action: &'static str,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A bridge request could not be serialised to JSON.
    #[error("failed to serialise engine request: {0}")]
    SerializeRequest(#[source] serde_json::Error),

    /// A bridge response could not be deserialised from JSON.
    #[error("failed to deserialise engine response: {message}")]
    DeserializeResponse {
        /// Human-readable description of the parse failure.
        message: String,
        /// Optional underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The engine returned a result of an unexpected shape.
    #[error("engine returned an unexpected result for {operation}: {message}")]
    UnexpectedResult {
        /// Operation whose result was malformed.
        operation: &'static str,
        /// Description of the mismatch.
        message: String,
    },

    /// The engine itself reported a failure, such as a syntax error.
    #[error("{operation} failed: {message}")]
    Engine {
        /// Operation that failed.
        operation: &'static str,
        /// Message reported by the engine.
        message: String,
    },
}

impl EngineError {
    /// Creates a resolution failure.
    pub fn not_found(
        package: impl Into<String>,
        from: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            package: package.into(),
            from: from.into(),
            message: message.into(),
        }
    }

    /// Wraps an I/O failure with the action being performed.
    pub fn io(action: &'static str, source: std::io::Error) -> Self {
        Self::Io {
            action,
            source: Arc::new(source),
        }
    }

    /// Creates an engine-reported failure.
    pub fn engine(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Engine {
            operation,
            message: message.into(),
        }
    }
}
