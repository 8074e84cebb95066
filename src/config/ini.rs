//! Minimal INI reader following raw config-parser conventions.
//!
//! Supported syntax:
//! - `[section]` headers; a repeated header continues the earlier section
//! - `key = value` or `key: value`, split at the first `=` or `:`
//! - keys lower-cased, keys and values trimmed, `""` as an explicit empty value
//! - `#` and `;` comment lines, and `;` inline comments preceded by whitespace
//! - indented continuation lines, appended to the previous value after a newline
//! - a `[DEFAULT]` section whose entries show through every other section

use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the section whose entries every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A syntax error at a 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct IniError {
    pub line: usize,
    pub message: String,
}

impl IniError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self { line, message: message.into() }
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    defaults: BTreeMap<String, String>,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn parse(content: &str) -> Result<Self, IniError> {
        let mut doc = IniDocument::default();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;

            if line.trim().is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                let (Some(section), Some(key)) = (&current, &last_key) else {
                    return Err(IniError::new(line_no, "indented line without a preceding entry"));
                };
                if let Some(value) = doc.section_mut(section).get_mut(key) {
                    value.push('\n');
                    value.push_str(line.trim());
                }
                continue;
            }

            if let Some(header) = parse_header(line) {
                if header.is_empty() {
                    return Err(IniError::new(line_no, "empty section name"));
                }
                doc.section_mut(header);
                current = Some(header.to_string());
                last_key = None;
                continue;
            }

            let Some(section) = &current else {
                return Err(IniError::new(line_no, "entry before the first section header"));
            };

            let (key, value) = parse_entry(line).ok_or_else(|| {
                IniError::new(line_no, format!("expected `key = value`, got {line:?}"))
            })?;
            doc.section_mut(section).insert(key.clone(), value);
            last_key = Some(key);
        }

        Ok(doc)
    }

    /// Whether a section other than `[DEFAULT]` was declared.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Entries of `name` layered over `[DEFAULT]`; empty when the section is absent.
    pub fn section_items(&self, name: &str) -> Vec<(String, String)> {
        let Some(section) = self.sections.get(name) else {
            return Vec::new();
        };
        let mut items = self.defaults.clone();
        items.extend(section.iter().map(|(k, v)| (k.clone(), v.clone())));
        items.into_iter().collect()
    }

    fn section_mut(&mut self, name: &str) -> &mut BTreeMap<String, String> {
        if name == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }
}

fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

fn parse_entry(line: &str) -> Option<(String, String)> {
    let sep = line.find(['=', ':'])?;
    let key = line[..sep].trim();
    if key.is_empty() {
        return None;
    }

    let mut value = &line[sep + 1..];
    if let Some(pos) = value.find(';') {
        if value[..pos].ends_with(char::is_whitespace) {
            value = &value[..pos];
        }
    }
    let value = match value.trim() {
        "\"\"" => "",
        other => other,
    };

    Some((key.to_lowercase(), value.to_string()))
}
