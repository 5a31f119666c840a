//! Precedence merging of CLI options and discovered configuration.

use prettierd_engine::{DiscoveredConfig, EngineOptions};

use crate::options::ConfigPrecedence;

/// Combines CLI options with discovered configuration.
///
/// Merges are shallow: a nested value from the winning side replaces the
/// other side's value wholesale.
#[must_use]
pub fn merge(
    precedence: ConfigPrecedence,
    cli: EngineOptions,
    discovered: Option<DiscoveredConfig>,
) -> EngineOptions {
    let Some(discovered) = discovered else {
        return cli;
    };
    match precedence {
        ConfigPrecedence::PreferFile => discovered.into_options(),
        ConfigPrecedence::FileOverride => overlay(cli, discovered.into_options()),
        ConfigPrecedence::CliOverride => overlay(discovered.into_options(), cli),
    }
}

fn overlay(mut base: EngineOptions, top: EngineOptions) -> EngineOptions {
    base.extend(top);
    base
}
