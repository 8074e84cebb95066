//! Key normalization across config-file, environment and flag spellings.

/// Long command-line flag prefix every canonical key starts with.
pub const LONG_PREFIX: &str = "--";

/// Normalize a config-file or environment key to long-flag form.
///
/// Underscores become hyphens and the `--` prefix is added when missing, so
/// `exists_action`, `exists-action` and `--exists-action` all meet at
/// `--exists-action`. Short spellings are never produced: `-v` becomes `---v`
/// and simply matches nothing.
pub fn normalize_key(key: &str) -> String {
    let key = key.replace('_', "-");
    if key.starts_with(LONG_PREFIX) {
        key
    } else {
        format!("{LONG_PREFIX}{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscores_become_hyphens() {
        assert_eq!(normalize_key("exists_action"), "--exists-action");
        assert_eq!(normalize_key("default_timeout"), "--default-timeout");
    }

    #[test]
    fn test_bare_and_prefixed_keys_meet() {
        assert_eq!(normalize_key("timeout"), normalize_key("--timeout"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for key in ["timeout", "--timeout", "exists_action", "-v", "", "__x"] {
            let once = normalize_key(key);
            assert_eq!(normalize_key(&once), once, "key {key:?}");
        }
    }

    #[test]
    fn test_short_spelling_never_becomes_short_flag() {
        assert_eq!(normalize_key("-v"), "---v");
        assert_eq!(normalize_key("v"), "--v");
    }

    #[test]
    fn test_empty_key_is_bare_prefix() {
        assert_eq!(normalize_key(""), "--");
    }
}
