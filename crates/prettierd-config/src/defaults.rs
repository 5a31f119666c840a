use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Executable used to run the Node bridge when none is configured.
pub const DEFAULT_NODE_BINARY: &str = "node";

/// Ignore file consulted when `--ignore-path` is not supplied.
pub const DEFAULT_IGNORE_PATH: &str = ".prettierignore";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
///
/// The binary runs as a short-lived client on a developer terminal, so the
/// single-line format is the default.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Owned default Node executable name.
#[must_use]
pub fn default_node_binary_string() -> String {
    DEFAULT_NODE_BINARY.to_owned()
}
