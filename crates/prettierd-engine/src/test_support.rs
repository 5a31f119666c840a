//! Scripted collaborators for tests that must not spawn `node`.
//!
//! [`ScriptedEngine`] answers every engine question from fields set up front
//! and records each call in a shared [`CallLog`] so tests can assert on what
//! the request core asked. [`StaticLocator`] and [`StaticLoader`] stand in for
//! module resolution.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use prettierd_config::EnvSnapshot;

use crate::capability::{
    ConfigQuery, DiscoveredConfig, Engine, EngineOptions, FileInfo, FileInfoQuery,
};
use crate::error::EngineError;
use crate::resolver::{ENGINE_PACKAGE, EngineLoader, ModuleLocator};

/// A call observed by a [`ScriptedEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `resolve_config` was invoked.
    ResolveConfig {
        /// Path passed to the engine.
        path: PathBuf,
        /// Discovery parameters.
        query: ConfigQuery,
    },
    /// `file_info` was invoked.
    FileInfo {
        /// Path passed to the engine.
        path: PathBuf,
        /// Ignore-file parameters.
        query: FileInfoQuery,
    },
    /// `format` was invoked.
    Format {
        /// Source text.
        text: String,
        /// Options received.
        options: EngineOptions,
    },
    /// `check` was invoked.
    Check {
        /// Source text.
        text: String,
        /// Options received.
        options: EngineOptions,
    },
}

/// Shared record of engine calls.
pub type CallLog = Rc<RefCell<Vec<EngineCall>>>;

/// Engine whose answers are fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    discovered: Option<DiscoveredConfig>,
    explicit: Option<DiscoveredConfig>,
    ignored: bool,
    formatted: Option<String>,
    already_formatted: bool,
    calls: CallLog,
}

impl ScriptedEngine {
    /// Creates an engine that discovers nothing, ignores nothing, echoes
    /// input when formatting, and reports every check as failing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config returned when discovery searches upwards from a file.
    #[must_use]
    pub fn with_discovered(mut self, config: EngineOptions) -> Self {
        self.discovered = Some(DiscoveredConfig::new(config));
        self
    }

    /// Config returned when discovery is given an explicit file.
    #[must_use]
    pub fn with_explicit(mut self, config: EngineOptions) -> Self {
        self.explicit = Some(DiscoveredConfig::new(config));
        self
    }

    /// Reports every file as ignored.
    #[must_use]
    pub const fn ignoring(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Output returned by `format`.
    #[must_use]
    pub fn formatting_to(mut self, output: impl Into<String>) -> Self {
        self.formatted = Some(output.into());
        self
    }

    /// Result returned by `check`.
    #[must_use]
    pub const fn reporting_formatted(mut self, formatted: bool) -> Self {
        self.already_formatted = formatted;
        self
    }

    /// Handle on the calls this engine records.
    #[must_use]
    pub fn call_log(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    fn record(&self, call: EngineCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Engine for ScriptedEngine {
    fn resolve_config(
        &self,
        path: &Path,
        query: &ConfigQuery,
    ) -> Result<Option<DiscoveredConfig>, EngineError> {
        self.record(EngineCall::ResolveConfig {
            path: path.to_path_buf(),
            query: query.clone(),
        });
        Ok(if query.config.is_some() {
            self.explicit.clone()
        } else {
            self.discovered.clone()
        })
    }

    fn file_info(&self, path: &Path, query: &FileInfoQuery) -> Result<FileInfo, EngineError> {
        self.record(EngineCall::FileInfo {
            path: path.to_path_buf(),
            query: query.clone(),
        });
        Ok(FileInfo {
            ignored: self.ignored,
            inferred_parser: None,
        })
    }

    fn format(&self, text: &str, options: &EngineOptions) -> Result<String, EngineError> {
        self.record(EngineCall::Format {
            text: text.to_owned(),
            options: options.clone(),
        });
        Ok(self.formatted.clone().unwrap_or_else(|| text.to_owned()))
    }

    fn check(&self, text: &str, options: &EngineOptions) -> Result<bool, EngineError> {
        self.record(EngineCall::Check {
            text: text.to_owned(),
            options: options.clone(),
        });
        Ok(self.already_formatted)
    }
}

/// A locator call observed by a [`StaticLocator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateCall {
    /// Project-scoped resolution.
    Local {
        /// Directory resolution started from.
        start_dir: PathBuf,
        /// Shim registered beforehand.
        pnp_shim: Option<PathBuf>,
    },
    /// Global fallback resolution.
    Global,
}

/// Locator answering from fixed paths.
#[derive(Debug, Default)]
pub struct StaticLocator {
    local: Option<PathBuf>,
    global: Option<PathBuf>,
    calls: RefCell<Vec<LocateCall>>,
}

impl StaticLocator {
    /// Creates a locator with the given local and global answers; `None`
    /// makes the corresponding lookup fail.
    #[must_use]
    pub fn new(local: Option<PathBuf>, global: Option<PathBuf>) -> Self {
        Self {
            local,
            global,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Calls observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<LocateCall> {
        self.calls.borrow().clone()
    }
}

impl ModuleLocator for StaticLocator {
    fn locate(
        &self,
        start_dir: &Path,
        pnp_shim: Option<&Path>,
        _env: &EnvSnapshot,
    ) -> Result<PathBuf, EngineError> {
        self.calls.borrow_mut().push(LocateCall::Local {
            start_dir: start_dir.to_path_buf(),
            pnp_shim: pnp_shim.map(Path::to_path_buf),
        });
        self.local.clone().ok_or_else(|| {
            EngineError::not_found(
                ENGINE_PACKAGE,
                start_dir.display().to_string(),
                "not installed",
            )
        })
    }

    fn locate_global(
        &self,
        _pnp_shim: Option<&Path>,
        _env: &EnvSnapshot,
    ) -> Result<PathBuf, EngineError> {
        self.calls.borrow_mut().push(LocateCall::Global);
        self.global
            .clone()
            .ok_or_else(|| EngineError::not_found(ENGINE_PACKAGE, "global install", "not installed"))
    }
}

/// Loader handing out one pre-built engine.
#[derive(Default)]
pub struct StaticLoader {
    engine: RefCell<Option<Box<dyn Engine>>>,
    loaded: RefCell<Vec<PathBuf>>,
}

impl StaticLoader {
    /// Loader that yields `engine` on the first load.
    #[must_use]
    pub fn with_engine(engine: impl Engine + 'static) -> Self {
        Self {
            engine: RefCell::new(Some(Box::new(engine))),
            loaded: RefCell::new(Vec::new()),
        }
    }

    /// Loader that finds no usable module.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Paths passed to `load` so far.
    #[must_use]
    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        self.loaded.borrow().clone()
    }
}

impl std::fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticLoader")
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl EngineLoader for StaticLoader {
    fn load(
        &self,
        resolved: &Path,
        _pnp_shim: Option<&Path>,
        _env: &EnvSnapshot,
    ) -> Result<Option<Box<dyn Engine>>, EngineError> {
        self.loaded.borrow_mut().push(resolved.to_path_buf());
        Ok(self.engine.borrow_mut().take())
    }
}
