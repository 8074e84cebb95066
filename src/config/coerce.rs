//! Conversion of raw strings into typed option values.

use super::loader::Origin;
use crate::error::{ConfigError, Result};
use crate::schema::{OptionDescriptor, OptionValue, ValueKind};

const TRUTHY: &[&str] = &["y", "yes", "t", "true", "on", "1"];
const FALSY: &[&str] = &["n", "no", "f", "false", "off", "0"];

/// Parse a boolean token, case-insensitively.
///
/// ```
/// use pipconf::config::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Ok(true));
/// assert_eq!(parse_bool("off"), Ok(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    let lowered = raw.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(format!("invalid truth value {raw:?}"))
    }
}

/// Coerce `raw` according to `descriptor.kind`.
///
/// Returns `Ok(None)` for an empty string, which counts as not provided.
/// `key` and `origin` only label the error.
pub fn coerce(
    descriptor: &OptionDescriptor,
    key: &str,
    raw: &str,
    origin: &Origin,
) -> Result<Option<OptionValue>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        origin: origin.clone(),
        reason,
    };

    let value = match descriptor.kind {
        ValueKind::Flag => OptionValue::Flag(parse_bool(raw).map_err(invalid)?),
        // A configured counter is an absolute count, not an increment.
        ValueKind::Counter => OptionValue::Count(u8::from(parse_bool(raw).map_err(invalid)?)),
        ValueKind::Str => OptionValue::Str(raw.to_string()),
        ValueKind::Float => OptionValue::Float(
            raw.trim().parse::<f64>().map_err(|err| invalid(format!("expected a number: {err}")))?,
        ),
        ValueKind::StrList => OptionValue::List(split_list(raw)),
        ValueKind::Choice(choices) => {
            let members = split_list(raw);
            if let Some(bad) = members.iter().find(|m| !choices.contains(&m.as_str())) {
                let allowed =
                    choices.iter().map(|c| format!("'{c}'")).collect::<Vec<_>>().join(", ");
                return Err(invalid(format!("invalid choice '{bad}' (choose from {allowed})")));
            }
            OptionValue::List(members)
        }
    };
    Ok(Some(value))
}

/// Split a list value on any whitespace, newlines included.
fn split_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
