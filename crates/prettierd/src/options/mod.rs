//! Option decoder for pass-through argument tokens.
//!
//! Tokens such as `--print-width=40` or `--no-semi` are decoded into a
//! camelCase keyed table of typed values. Decoding is total: every token
//! produces an entry, and malformed-looking input degrades to a string or a
//! boolean flag rather than an error.
//!
//! Three keys steer the request itself rather than the engine (`config`,
//! `configPrecedence` and `editorconfig`). [`CliOptions::from_tokens`] lifts
//! them into typed fields and leaves the rest for the engine.

use std::collections::BTreeMap;
use std::str::FromStr;

use prettierd_engine::EngineOptions;
use serde_json::{Number, Value};
use strum::{Display, EnumString};
use tracing::warn;


const OPTIONS_TARGET: &str = "prettierd::options";

const CONFIG_KEY: &str = "config";
const CONFIG_PRECEDENCE_KEY: &str = "configPrecedence";
const EDITORCONFIG_KEY: &str = "editorconfig";

/// A decoded option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// A flag or a literal `true`/`false`.
    Bool(bool),
    /// An all-digit value.
    Number(Number),
    /// Anything else.
    Text(String),
}

impl OptionValue {
    fn decode(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            digits if digits.bytes().all(|byte| byte.is_ascii_digit()) => decode_number(digits),
            text => Self::Text(text.to_owned()),
        }
    }
}

/// Parses an all-digit string, widening to a float past `u64::MAX`.
fn decode_number(digits: &str) -> OptionValue {
    if let Ok(value) = digits.parse::<u64>() {
        return OptionValue::Number(Number::from(value));
    }
    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| OptionValue::Text(digits.to_owned()), OptionValue::Number)
}

impl From<OptionValue> for Value {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Bool(flag) => Self::Bool(flag),
            OptionValue::Number(number) => Self::Number(number),
            OptionValue::Text(text) => Self::String(text),
        }
    }
}

/// Decodes pass-through tokens into a camelCase keyed table.
///
/// Later tokens overwrite earlier ones with the same key.
#[must_use]
pub fn decode_tokens<S: AsRef<str>>(tokens: &[S]) -> BTreeMap<String, OptionValue> {
    tokens
        .iter()
        .map(|token| decode_token(token.as_ref()))
        .collect()
}

fn decode_token(token: &str) -> (String, OptionValue) {
    let stripped = token.trim_start_matches('-');
    let (key, raw) = stripped.split_once('=').unwrap_or((stripped, ""));
    if raw.is_empty() {
        return match key.strip_prefix("no-") {
            Some(negated) => (camel_case(negated), OptionValue::Bool(false)),
            None => (camel_case(key), OptionValue::Bool(true)),
        };
    }
    (camel_case(key), OptionValue::decode(raw))
}

/// Converts kebab-case to camelCase; `-x` becomes `X`.
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Where configuration discovery should look.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Search upwards from the file.
    #[default]
    Unset,
    /// Discovery is turned off (`--no-config`).
    Disabled,
    /// An explicit configuration file (`--config=<path>`).
    Path(String),
}

/// Which of CLI options and discovered configuration wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigPrecedence {
    /// Discovered first, CLI second; CLI keys win.
    #[default]
    CliOverride,
    /// CLI first, discovered second; discovered keys win.
    FileOverride,
    /// Discovered configuration alone when present.
    PreferFile,
}

/// Typed request options plus the pass-through side table.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    /// Configuration discovery mode.
    pub config: ConfigSource,
    /// Merge strategy.
    pub config_precedence: ConfigPrecedence,
    /// Whether `.editorconfig` contributes to discovery.
    pub editorconfig: bool,
    /// Options forwarded to the engine.
    pub passthrough: BTreeMap<String, OptionValue>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config: ConfigSource::Unset,
            config_precedence: ConfigPrecedence::CliOverride,
            editorconfig: true,
            passthrough: BTreeMap::new(),
        }
    }
}

impl CliOptions {
    /// Decodes tokens and lifts the reserved keys into typed fields.
    ///
    /// Unusable reserved values keep their defaults and log a warning.
    #[must_use]
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut passthrough = decode_tokens(tokens);
        let mut options = Self::default();

        if let Some(value) = passthrough.remove(CONFIG_KEY) {
            options.config = lift_config(value);
        }
        if let Some(value) = passthrough.remove(CONFIG_PRECEDENCE_KEY) {
            options.config_precedence = lift_precedence(&value);
        }
        if let Some(value) = passthrough.remove(EDITORCONFIG_KEY) {
            match value {
                OptionValue::Bool(flag) => options.editorconfig = flag,
                other => warn!(
                    target: OPTIONS_TARGET,
                    value = ?other,
                    "--editorconfig takes no value; keeping the default"
                ),
            }
        }

        options.passthrough = passthrough;
        options
    }

    /// The pass-through options as an engine option object.
    #[must_use]
    pub fn engine_options(&self) -> EngineOptions {
        self.passthrough
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.clone())))
            .collect()
    }
}

fn lift_config(value: OptionValue) -> ConfigSource {
    match value {
        OptionValue::Bool(false) => ConfigSource::Disabled,
        OptionValue::Text(path) => ConfigSource::Path(path),
        OptionValue::Number(number) => ConfigSource::Path(number.to_string()),
        OptionValue::Bool(true) => {
            warn!(
                target: OPTIONS_TARGET,
                "--config was given without a path; searching for configuration instead"
            );
            ConfigSource::Unset
        }
    }
}

fn lift_precedence(value: &OptionValue) -> ConfigPrecedence {
    if let OptionValue::Text(name) = value
        && let Ok(precedence) = ConfigPrecedence::from_str(name)
    {
        return precedence;
    }
    warn!(
        target: OPTIONS_TARGET,
        value = ?value,
        "unrecognised --config-precedence; using cli-override"
    );
    ConfigPrecedence::default()
}
