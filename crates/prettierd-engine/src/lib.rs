//! Formatting engine capability, resolution, and the Node bridge.
//!
//! The request core treats the formatting engine as an injected capability:
//! anything implementing [`Engine`] can discover configuration, answer ignore
//! queries, format, and check text. This crate defines that seam, the policy
//! for finding an engine for a file ([`EngineResolver`]), and the production
//! implementation that drives an installed engine through short-lived `node`
//! helpers.
//!
//! # Architecture
//!
//! Resolution is split between a [`ModuleLocator`], which turns a directory
//! into an engine entry point, and an [`EngineLoader`], which turns an entry
//! point into an [`Engine`]. The resolver owns the fallback policy between
//! project-local and global installs. Both seams are traits so tests can swap
//! in scripted collaborators (see the `test-support` feature) instead of
//! spawning `node`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use prettierd_config::EnvSnapshot;
//! use prettierd_engine::{EngineResolver, NodeBridgeLoader, NodeLocator};
//!
//! let resolver = EngineResolver::new(
//!     NodeLocator::new("node", None),
//!     NodeBridgeLoader::new("node"),
//! );
//! let env = EnvSnapshot::capture(Vec::<(String, Option<String>)>::new());
//! let project = Path::new("/project");
//! if let Ok(Some(resolved)) = resolver.resolve(&env, project, &project.join("src")) {
//!     println!("engine at {}", resolved.resolved_path().display());
//! }
//! ```

pub mod bridge;
pub mod capability;
pub mod error;
pub mod protocol;
pub mod resolver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod tests;

pub use self::bridge::{NodeBridgeEngine, NodeBridgeLoader, NodeLocator};
pub use self::capability::{
    ConfigQuery, DiscoveredConfig, Engine, EngineOptions, FileInfo, FileInfoQuery,
};
pub use self::error::EngineError;
pub use self::resolver::{
    ENGINE_PACKAGE, EngineLoader, EngineResolver, ModuleLocator, ResolvedEngine, find_pnp_shim,
};
