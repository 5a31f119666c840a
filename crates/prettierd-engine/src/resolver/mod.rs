//! Locates and loads the formatting engine for a request.
//!
//! Resolution runs in three steps. A [`ModuleLocator`] first resolves the
//! engine package from the target file's directory, with any plug-and-play
//! shim found in the working directory registered beforehand. When that fails
//! the resolver either gives up (local-only mode) or retries from the global
//! install. An [`EngineLoader`] then turns the resolved path into a usable
//! [`Engine`]. Nothing is cached: every request resolves afresh.

use std::path::{Path, PathBuf};

use prettierd_config::EnvSnapshot;
use tracing::debug;

use crate::capability::Engine;
use crate::error::EngineError;

/// Tracing target for engine resolution.
const RESOLVER_TARGET: &str = "prettierd_engine::resolver";

/// Package name of the engine.
pub const ENGINE_PACKAGE: &str = "prettier";

/// Plug-and-play shim files, in lookup order.
pub const PNP_SHIMS: &[&str] = &[".pnp.cjs", ".pnp.js"];

/// Module-style resolution of the engine package.
pub trait ModuleLocator {
    /// Resolves the engine entry point reachable from `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the package is not installed where
    /// `start_dir` can see it, or when the resolver itself fails.
    fn locate(
        &self,
        start_dir: &Path,
        pnp_shim: Option<&Path>,
        env: &EnvSnapshot,
    ) -> Result<PathBuf, EngineError>;

    /// Resolves the engine entry point from the global install.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when no global install is reachable.
    fn locate_global(
        &self,
        pnp_shim: Option<&Path>,
        env: &EnvSnapshot,
    ) -> Result<PathBuf, EngineError>;
}

/// Loads a resolved entry point into an [`Engine`].
pub trait EngineLoader {
    /// Loads the engine at `resolved`.
    ///
    /// Returns `Ok(None)` when the path does not hold a usable module.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when loading fails for reasons other than
    /// the module being absent.
    fn load(
        &self,
        resolved: &Path,
        pnp_shim: Option<&Path>,
        env: &EnvSnapshot,
    ) -> Result<Option<Box<dyn Engine>>, EngineError>;
}

/// An engine together with the path it was loaded from.
pub struct ResolvedEngine {
    engine: Box<dyn Engine>,
    resolved_path: PathBuf,
}

impl ResolvedEngine {
    /// Pairs a loaded engine with its entry point.
    #[must_use]
    pub fn new(engine: Box<dyn Engine>, resolved_path: PathBuf) -> Self {
        Self {
            engine,
            resolved_path,
        }
    }

    /// The loaded engine.
    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Entry point the engine was loaded from.
    #[must_use]
    pub fn resolved_path(&self) -> &Path {
        self.resolved_path.as_path()
    }
}

impl std::fmt::Debug for ResolvedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedEngine")
            .field("resolved_path", &self.resolved_path)
            .finish_non_exhaustive()
    }
}

/// Resolves engines by combining a locator with a loader.
#[derive(Debug)]
pub struct EngineResolver<L, D> {
    locator: L,
    loader: D,
}

impl<L, D> EngineResolver<L, D> {
    /// Creates a resolver from its collaborators.
    #[must_use]
    pub const fn new(locator: L, loader: D) -> Self {
        Self { locator, loader }
    }

    /// The module locator.
    #[must_use]
    pub const fn locator(&self) -> &L {
        &self.locator
    }

    /// The engine loader.
    #[must_use]
    pub const fn loader(&self) -> &D {
        &self.loader
    }
}

impl<L: ModuleLocator, D: EngineLoader> EngineResolver<L, D> {
    /// Resolves the engine for a file in `start_dir`.
    ///
    /// Returns `Ok(None)` when no engine is available: either local
    /// resolution failed in local-only mode, or the resolved path held no
    /// usable module.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the global fallback fails or loading
    /// fails.
    pub fn resolve(
        &self,
        env: &EnvSnapshot,
        cwd: &Path,
        start_dir: &Path,
    ) -> Result<Option<ResolvedEngine>, EngineError> {
        let pnp_shim = find_pnp_shim(cwd);
        let shim = pnp_shim.as_deref();

        let resolved_path = match self.locator.locate(start_dir, shim, env) {
            Ok(path) => path,
            Err(error) if env.local_engine_only() => {
                debug!(
                    target: RESOLVER_TARGET,
                    start_dir = %start_dir.display(),
                    %error,
                    "no local engine and local-only mode is set"
                );
                return Ok(None);
            }
            Err(error) => {
                debug!(
                    target: RESOLVER_TARGET,
                    start_dir = %start_dir.display(),
                    %error,
                    "local engine resolution failed, trying global install"
                );
                self.locator.locate_global(shim, env)?
            }
        };

        let Some(engine) = self.loader.load(&resolved_path, shim, env)? else {
            debug!(
                target: RESOLVER_TARGET,
                resolved = %resolved_path.display(),
                "resolved path holds no usable engine"
            );
            return Ok(None);
        };

        debug!(
            target: RESOLVER_TARGET,
            resolved = %resolved_path.display(),
            "engine loaded"
        );
        Ok(Some(ResolvedEngine::new(engine, resolved_path)))
    }
}

/// Finds a plug-and-play shim in `cwd`.
#[must_use]
pub fn find_pnp_shim(cwd: &Path) -> Option<PathBuf> {
    PNP_SHIMS
        .iter()
        .map(|name| cwd.join(name))
        .find(|candidate| candidate.is_file())
}
