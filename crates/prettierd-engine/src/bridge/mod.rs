//! Node-backed engine resolution and execution.
//!
//! [`NodeLocator`] delegates module resolution to `node` itself so that
//! `node_modules` walking, package `exports`, and plug-and-play installs all
//! behave exactly as they would for the project's own tooling.
//! [`NodeBridgeLoader`] accepts a resolved entry point and produces a
//! [`NodeBridgeEngine`], which forwards each engine call to a short-lived
//! helper process over the JSONL protocol in [`crate::protocol`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use prettierd_config::EnvSnapshot;
use serde::de::DeserializeOwned;

use crate::capability::{
    ConfigQuery, DiscoveredConfig, Engine, EngineOptions, FileInfo, FileInfoQuery,
};
use crate::error::EngineError;
use crate::protocol::{BridgeOperation, BridgeRequest, BridgeResponse};
use crate::resolver::{ENGINE_PACKAGE, EngineLoader, ModuleLocator};

mod process;

use self::process::{NodeCommand, exchange, resolve_module};

/// Resolves the engine package by asking `node`.
#[derive(Debug, Clone)]
pub struct NodeLocator {
    node_binary: OsString,
    global_engine_path: Option<PathBuf>,
}

impl NodeLocator {
    /// Creates a locator that runs `node_binary`.
    ///
    /// `global_engine_path` names a directory searched by the global
    /// fallback; without one the fallback uses node's default search paths.
    #[must_use]
    pub fn new(node_binary: impl Into<OsString>, global_engine_path: Option<PathBuf>) -> Self {
        Self {
            node_binary: node_binary.into(),
            global_engine_path,
        }
    }
}

impl ModuleLocator for NodeLocator {
    fn locate(
        &self,
        start_dir: &Path,
        pnp_shim: Option<&Path>,
        env: &EnvSnapshot,
    ) -> Result<PathBuf, EngineError> {
        let node = NodeCommand {
            program: &self.node_binary,
            pnp_shim,
            env,
        };
        resolve_module(&node, ENGINE_PACKAGE, Some(start_dir)).map(PathBuf::from)
    }

    fn locate_global(
        &self,
        pnp_shim: Option<&Path>,
        env: &EnvSnapshot,
    ) -> Result<PathBuf, EngineError> {
        let node = NodeCommand {
            program: &self.node_binary,
            pnp_shim,
            env,
        };
        resolve_module(&node, ENGINE_PACKAGE, self.global_engine_path.as_deref())
            .map(PathBuf::from)
    }
}

/// Loads resolved entry points as [`NodeBridgeEngine`]s.
#[derive(Debug, Clone)]
pub struct NodeBridgeLoader {
    node_binary: OsString,
}

impl NodeBridgeLoader {
    /// Creates a loader whose engines run `node_binary`.
    #[must_use]
    pub fn new(node_binary: impl Into<OsString>) -> Self {
        Self {
            node_binary: node_binary.into(),
        }
    }
}

impl EngineLoader for NodeBridgeLoader {
    fn load(
        &self,
        resolved: &Path,
        pnp_shim: Option<&Path>,
        env: &EnvSnapshot,
    ) -> Result<Option<Box<dyn Engine>>, EngineError> {
        // Plug-and-play installs resolve into zip archives that only exist
        // for node once the shim is registered.
        if pnp_shim.is_none() && !resolved.is_file() {
            return Ok(None);
        }
        Ok(Some(Box::new(NodeBridgeEngine {
            node_binary: self.node_binary.clone(),
            module: resolved.to_path_buf(),
            pnp_shim: pnp_shim.map(Path::to_path_buf),
            env: env.clone(),
        })))
    }
}

/// Engine that runs each call in a fresh `node` helper.
#[derive(Debug, Clone)]
pub struct NodeBridgeEngine {
    node_binary: OsString,
    module: PathBuf,
    pnp_shim: Option<PathBuf>,
    env: EnvSnapshot,
}

impl NodeBridgeEngine {
    /// Entry point the helper loads.
    #[must_use]
    pub fn module(&self) -> &Path {
        self.module.as_path()
    }

    fn call<T: DeserializeOwned>(&self, operation: BridgeOperation) -> Result<T, EngineError> {
        let name = operation.name();
        let node = NodeCommand {
            program: &self.node_binary,
            pnp_shim: self.pnp_shim.as_deref(),
            env: &self.env,
        };
        let request = BridgeRequest::new(&self.module, operation);
        match exchange(&node, &request)? {
            BridgeResponse::Ok { result } => {
                serde_json::from_value(result).map_err(|error| EngineError::UnexpectedResult {
                    operation: name,
                    message: error.to_string(),
                })
            }
            BridgeResponse::Error { message } => Err(EngineError::engine(name, message)),
        }
    }
}

impl Engine for NodeBridgeEngine {
    fn resolve_config(
        &self,
        path: &Path,
        query: &ConfigQuery,
    ) -> Result<Option<DiscoveredConfig>, EngineError> {
        self.call(BridgeOperation::ResolveConfig {
            path: path.to_path_buf(),
            query: query.clone(),
        })
    }

    fn file_info(&self, path: &Path, query: &FileInfoQuery) -> Result<FileInfo, EngineError> {
        self.call(BridgeOperation::FileInfo {
            path: path.to_path_buf(),
            query: query.clone(),
        })
    }

    fn format(&self, text: &str, options: &EngineOptions) -> Result<String, EngineError> {
        self.call(BridgeOperation::Format {
            text: text.to_owned(),
            options: options.clone(),
        })
    }

    fn check(&self, text: &str, options: &EngineOptions) -> Result<bool, EngineError> {
        self.call(BridgeOperation::Check {
            text: text.to_owned(),
            options: options.clone(),
        })
    }
}
