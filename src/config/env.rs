//! Injected environment snapshot.

use std::collections::BTreeMap;

/// Prefix marking environment variables that carry option values.
pub const ENV_PREFIX: &str = "PIP_";

/// Variable naming an alternative config file.
pub const CONFIG_FILE_VAR: &str = "PIP_CONFIG_FILE";

/// A snapshot of environment variables.
///
/// Resolution reads the environment only through this type, so callers decide
/// whether it reflects the live process or a fixed mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment. Non-Unicode entries are skipped.
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Variables starting with `prefix`, as (variable name, lower-cased key, value).
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, String, &'a str)> + 'a {
        self.iter().filter_map(move |(name, value)| {
            name.strip_prefix(prefix).map(|rest| (name, rest.to_lowercase(), value))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
