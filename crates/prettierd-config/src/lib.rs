//! Shared configuration for the prettierd request core and binary.
//!
//! Two kinds of settings live here. [`Config`] holds the daemon-side knobs
//! (logging, the `node` executable, the fallback engine install) and is loaded
//! once per process through `ortho_config` from defaults, configuration files
//! and `PRETTIERD_*` environment variables. [`EnvSnapshot`] captures the
//! per-request environment: the process environment overlaid with whatever the
//! client sent alongside its arguments. Request handling only ever reads the
//! snapshot, never the live process environment.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod environment;
mod logging;

pub use defaults::{
    DEFAULT_IGNORE_PATH, DEFAULT_LOG_FILTER, DEFAULT_NODE_BINARY, default_log_filter,
    default_log_filter_string, default_log_format, default_node_binary_string,
};
pub use environment::{DEFAULT_CONFIG_VAR, EnvSnapshot, LOCAL_ENGINE_ONLY_VAR};
pub use logging::{LogFormat, LogFormatParseError};

/// Process-level settings for the prettierd binary.
///
/// Request arguments are never fed to the loader: the binary passes only its
/// program name so pass-through formatting options cannot collide with
/// configuration flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PRETTIERD")]
pub struct Config {
    /// Tracing filter expression applied to stderr logging.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Executable used to run the Node bridge.
    #[serde(default = "default_node_binary_string")]
    #[ortho_config(default = default_node_binary_string())]
    pub node_binary: String,
    /// Directory of an engine installation used when no project-local engine
    /// resolves.
    #[serde(default)]
    pub global_engine_path: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            node_binary: default_node_binary_string(),
            global_engine_path: None,
        }
    }
}

impl Config {
    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Executable used to run the Node bridge.
    #[must_use]
    pub fn node_binary(&self) -> &str {
        self.node_binary.as_str()
    }

    /// Optional fallback engine installation directory.
    #[must_use]
    pub fn global_engine_path(&self) -> Option<&camino::Utf8Path> {
        self.global_engine_path.as_deref()
    }
}
