//! Plain-text and JSON reports of option values.

use anyhow::{Context, Result};
use std::fmt::Write as _;

use pipconf::config::Defaults;

/// One `name = value  (origin)` line per option, sorted by name.
pub fn format_options(defaults: &Defaults) -> String {
    let width = defaults.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, resolved) in defaults.iter() {
        let _ = writeln!(out, "{name:<width$} = {}  ({})", resolved.value, resolved.origin);
    }
    out
}

pub fn format_json(defaults: &Defaults) -> Result<String> {
    serde_json::to_string_pretty(defaults).context("Failed to serialize resolved defaults")
}
