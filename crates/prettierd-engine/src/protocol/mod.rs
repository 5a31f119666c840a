//! IPC protocol types for the Node bridge.
//!
//! The protocol is a single-line JSONL exchange over stdio. The bridge writes
//! one [`BridgeRequest`] line to the helper's stdin and closes it. The helper
//! loads the engine module named in the request, performs one operation, and
//! writes one [`BridgeResponse`] line to stdout before exiting. Helper stderr
//! is captured for diagnostics but is not part of the protocol.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capability::{ConfigQuery, EngineOptions, FileInfoQuery};

/// Request written to the helper's stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRequest {
    module: PathBuf,
    #[serde(flatten)]
    operation: BridgeOperation,
}

impl BridgeRequest {
    /// Creates a request against the engine module at `module`.
    #[must_use]
    pub fn new(module: &Path, operation: BridgeOperation) -> Self {
        Self {
            module: module.to_path_buf(),
            operation,
        }
    }

    /// Path of the engine entry point the helper loads.
    #[must_use]
    pub fn module(&self) -> &Path {
        self.module.as_path()
    }

    /// Operation to perform.
    #[must_use]
    pub const fn operation(&self) -> &BridgeOperation {
        &self.operation
    }
}

/// Operations the helper understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum BridgeOperation {
    /// Discover configuration for a path.
    ResolveConfig {
        /// File or directory discovery starts from.
        path: PathBuf,
        /// Discovery parameters.
        query: ConfigQuery,
    },
    /// Report ignore status for a path.
    FileInfo {
        /// File being checked.
        path: PathBuf,
        /// Ignore-file parameters.
        query: FileInfoQuery,
    },
    /// Format a buffer.
    Format {
        /// Source text.
        text: String,
        /// Final engine options.
        options: EngineOptions,
    },
    /// Check whether a buffer is already formatted.
    Check {
        /// Source text.
        text: String,
        /// Final engine options.
        options: EngineOptions,
    },
}

impl BridgeOperation {
    /// Stable operation name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ResolveConfig { .. } => "resolve_config",
            Self::FileInfo { .. } => "file_info",
            Self::Format { .. } => "format",
            Self::Check { .. } => "check",
        }
    }
}

/// Response read from the helper's stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BridgeResponse {
    /// The operation completed; `result` is operation specific.
    Ok {
        /// Operation result, `null` when the engine returned nothing.
        #[serde(default)]
        result: serde_json::Value,
    },
    /// The engine raised an error.
    Error {
        /// Error message reported by the engine.
        message: String,
    },
}

#[cfg(test)]
mod tests;
