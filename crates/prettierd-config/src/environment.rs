//! Per-request environment snapshots.
//!
//! A client sends its own environment alongside each request. The snapshot
//! layers those values over the daemon's process environment so toggles such
//! as [`LOCAL_ENGINE_ONLY_VAR`] follow the client's shell rather than whatever
//! the daemon inherited when it was spawned.

use std::collections::BTreeMap;
use std::env;

/// Restricts engine resolution to project-local installs when truthy.
pub const LOCAL_ENGINE_ONLY_VAR: &str = "PRETTIERD_LOCAL_PRETTIER_ONLY";

/// Names a configuration file consulted when discovery finds nothing.
pub const DEFAULT_CONFIG_VAR: &str = "PRETTIERD_DEFAULT_CONFIG";

/// Values treated as "off" by [`EnvSnapshot::flag`].
const FALSE_VALUES: &[&str] = &["0", "false", "no", "off"];

/// Read-only view of the environment for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the process environment and applies the client overlay.
    ///
    /// Variables that are not valid Unicode are skipped.
    #[must_use]
    pub fn capture<I, K>(overlay: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let base = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        Self::layered(base, overlay)
    }

    /// Builds a snapshot from an explicit base and overlay.
    ///
    /// Overlay values win; an overlay entry of `None` removes the variable.
    #[must_use]
    pub fn layered<B, BK, BV, I, K>(base: B, overlay: I) -> Self
    where
        B: IntoIterator<Item = (BK, BV)>,
        BK: Into<String>,
        BV: Into<String>,
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let mut vars: BTreeMap<String, String> = base
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        for (key, value) in overlay {
            match value {
                Some(value) => {
                    vars.insert(key.into(), value);
                }
                None => {
                    vars.remove(&key.into());
                }
            }
        }
        Self { vars }
    }

    /// Returns the raw value of a variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Interprets a variable as a boolean toggle.
    ///
    /// Unset, empty, and the usual negative spellings (`0`, `false`, `no`,
    /// `off`, any case) read as `false`; every other value reads as `true`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).map(str::trim).is_some_and(|value| {
            !value.is_empty()
                && !FALSE_VALUES
                    .iter()
                    .any(|candidate| value.eq_ignore_ascii_case(candidate))
        })
    }

    /// Whether engine resolution must stay within the project.
    #[must_use]
    pub fn local_engine_only(&self) -> bool {
        self.flag(LOCAL_ENGINE_ONLY_VAR)
    }

    /// Path of the fallback configuration file, if one is set and non-empty.
    #[must_use]
    pub fn default_config_path(&self) -> Option<&str> {
        self.get(DEFAULT_CONFIG_VAR).filter(|value| !value.is_empty())
    }

    /// Iterates over every variable in the snapshot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn snapshot(overlay: &[(&str, Option<&str>)]) -> EnvSnapshot {
        EnvSnapshot::layered(
            [("HOME", "/home/dev"), (DEFAULT_CONFIG_VAR, "/etc/prettierrc")],
            overlay
                .iter()
                .map(|(key, value)| (*key, value.map(str::to_owned))),
        )
    }

    #[test]
    fn overlay_values_win_over_base() {
        let env = snapshot(&[("HOME", Some("/home/client"))]);
        assert_eq!(env.get("HOME"), Some("/home/client"));
    }

    #[test]
    fn overlay_none_removes_variable() {
        let env = snapshot(&[(DEFAULT_CONFIG_VAR, None)]);
        assert!(env.default_config_path().is_none());
    }

    #[test]
    fn empty_default_config_reads_as_unset() {
        let env = snapshot(&[(DEFAULT_CONFIG_VAR, Some(""))]);
        assert!(env.default_config_path().is_none());
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(""), false)]
    #[case(Some("0"), false)]
    #[case(Some("False"), false)]
    #[case(Some("off"), false)]
    #[case(Some("1"), true)]
    #[case(Some("true"), true)]
    #[case(Some("yes"), true)]
    fn local_engine_only_reads_boolean_ish_values(
        #[case] value: Option<&str>,
        #[case] expected: bool,
    ) {
        let env = snapshot(&[(LOCAL_ENGINE_ONLY_VAR, value)]);
        assert_eq!(env.local_engine_only(), expected);
    }

    #[test]
    fn capture_applies_overlay_to_process_environment() {
        let env = EnvSnapshot::capture([("PRETTIERD_TEST_ONLY_MARKER", Some(String::from("x")))]);
        assert_eq!(env.get("PRETTIERD_TEST_ONLY_MARKER"), Some("x"));
    }
}
