//! Configuration discovery for the target file.

use std::path::{Path, PathBuf};

use prettierd_config::EnvSnapshot;
use prettierd_engine::{ConfigQuery, DiscoveredConfig, Engine, EngineError};
use tracing::debug;

use crate::options::ConfigSource;

const DISCOVERY_TARGET: &str = "prettierd::discovery";

/// Finds the configuration that applies to `file_path`.
///
/// Discovery never runs when `config` is [`ConfigSource::Disabled`]. When the
/// engine finds nothing, the file named by `PRETTIERD_DEFAULT_CONFIG` is used
/// instead. Relative configuration paths are resolved against `cwd`.
///
/// # Errors
///
/// Propagates engine failures unchanged.
pub fn resolve_file_config(
    env: &EnvSnapshot,
    engine: &dyn Engine,
    cwd: &Path,
    file_path: &Path,
    config: &ConfigSource,
    editorconfig: bool,
) -> Result<Option<DiscoveredConfig>, EngineError> {
    let explicit = match config {
        ConfigSource::Disabled => {
            debug!(target: DISCOVERY_TARGET, "configuration discovery disabled");
            return Ok(None);
        }
        ConfigSource::Unset => None,
        ConfigSource::Path(path) => Some(resolve_against(cwd, path)),
    };

    let query = ConfigQuery::uncached(explicit, editorconfig);
    if let Some(found) = engine.resolve_config(file_path, &query)? {
        debug!(
            target: DISCOVERY_TARGET,
            file = %file_path.display(),
            keys = found.options().len(),
            "configuration discovered"
        );
        return Ok(Some(found));
    }

    let Some(configured) = env.default_config_path() else {
        return Ok(None);
    };
    let default_config = resolve_against(cwd, configured);
    let search_from = default_config
        .parent()
        .map_or_else(|| default_config.clone(), Path::to_path_buf);

    debug!(
        target: DISCOVERY_TARGET,
        default_config = %default_config.display(),
        "no configuration found, using the default configuration file"
    );
    engine.resolve_config(
        &search_from,
        &ConfigQuery::uncached(Some(default_config), editorconfig),
    )
}

/// Joins `path` onto `cwd` unless it is already absolute.
#[must_use]
pub(crate) fn resolve_against(cwd: &Path, path: &str) -> PathBuf {
    cwd.join(path)
}
