//! Log record formats for the binary's stderr output.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Format of the records written to stderr.
///
/// Defaults to [`LogFormat::Compact`]: the binary runs once per request under
/// an editor or a shell, where a person reads stderr next to the formatted
/// output. Daemon supervisors that ship logs elsewhere select `json`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event.
    Json,
    /// One terse human-readable line per event.
    #[default]
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
