//! The formatting capability a resolved engine exposes.
//!
//! The request core never formats text itself. It asks an [`Engine`] four
//! questions: which configuration applies to a file, whether the file is
//! ignored, what the formatted text is, and whether the text is already
//! formatted. Everything the engine consumes or produces as options is an
//! untyped JSON object because option names belong to the engine, not to this
//! workspace.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Option object handed to the engine.
pub type EngineOptions = serde_json::Map<String, serde_json::Value>;

/// Configuration discovered for a file, opaque to the request core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveredConfig(EngineOptions);

impl DiscoveredConfig {
    /// Wraps a discovered option object.
    #[must_use]
    pub const fn new(options: EngineOptions) -> Self {
        Self(options)
    }

    /// Borrows the discovered options.
    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.0
    }

    /// Consumes the wrapper, returning the options.
    #[must_use]
    pub fn into_options(self) -> EngineOptions {
        self.0
    }
}

impl From<EngineOptions> for DiscoveredConfig {
    fn from(options: EngineOptions) -> Self {
        Self(options)
    }
}

/// Parameters for configuration discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigQuery {
    /// Explicit configuration file; `None` lets the engine search upwards.
    pub config: Option<PathBuf>,
    /// Whether `.editorconfig` files contribute to the result.
    pub editorconfig: bool,
    /// Whether the engine may reuse previously read configuration.
    pub use_cache: bool,
}

impl ConfigQuery {
    /// Discovery that always re-reads configuration from disk.
    #[must_use]
    pub const fn uncached(config: Option<PathBuf>, editorconfig: bool) -> Self {
        Self {
            config,
            editorconfig,
            use_cache: false,
        }
    }
}

/// Parameters for ignore-file lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfoQuery {
    /// Ignore file consulted for the lookup.
    pub ignore_path: PathBuf,
}

/// Engine's view of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Whether the ignore file excludes the path.
    pub ignored: bool,
    /// Parser the engine would pick for the path, when it knows one.
    #[serde(default)]
    pub inferred_parser: Option<String>,
}

/// A loaded formatting engine.
///
/// Implementations may suspend on filesystem or process I/O; callers get no
/// timeout and a hung engine hangs the request.
pub trait Engine {
    /// Discovers configuration for `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be reached or a
    /// configuration file fails to parse.
    fn resolve_config(
        &self,
        path: &Path,
        query: &ConfigQuery,
    ) -> Result<Option<DiscoveredConfig>, EngineError>;

    /// Reports whether `path` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be reached or the
    /// ignore file is unreadable.
    fn file_info(&self, path: &Path, query: &FileInfoQuery) -> Result<FileInfo, EngineError>;

    /// Formats `text` with `options`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine rejects the input.
    fn format(&self, text: &str, options: &EngineOptions) -> Result<String, EngineError>;

    /// Reports whether `text` is already formatted under `options`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine rejects the input.
    fn check(&self, text: &str, options: &EngineOptions) -> Result<bool, EngineError>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn resolve_config(
        &self,
        path: &Path,
        query: &ConfigQuery,
    ) -> Result<Option<DiscoveredConfig>, EngineError> {
        (**self).resolve_config(path, query)
    }

    fn file_info(&self, path: &Path, query: &FileInfoQuery) -> Result<FileInfo, EngineError> {
        (**self).file_info(path, query)
    }

    fn format(&self, text: &str, options: &EngineOptions) -> Result<String, EngineError> {
        (**self).format(text, options)
    }

    fn check(&self, text: &str, options: &EngineOptions) -> Result<bool, EngineError> {
        (**self).check(text, options)
    }
}

#[cfg(test)]
mod tests;
