//! Precedence merging of raw config pairs.

use std::collections::BTreeMap;

use super::loader::{ConfigSources, Origin, RawPair};
use super::normalize::normalize_key;

/// A raw value after merging, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub origin: Origin,
    /// Position in the overall write order; higher means higher precedence.
    pub seq: usize,
}

/// Normalized key to winning raw value.
pub type RawMap = BTreeMap<String, RawValue>;

/// Merge global section, command section and environment pairs, in that order.
///
/// Each key is normalized and written over any earlier value for the same
/// key, so the command section beats the global section and the environment
/// beats both. Empty values count as not provided and never replace an
/// earlier value.
pub fn merge_sources(sources: &ConfigSources) -> RawMap {
    merge_pairs([&sources.global, &sources.command, &sources.environment].into_iter().flatten())
}

/// Merge pairs given in increasing precedence order.
pub fn merge_pairs<'a>(pairs: impl IntoIterator<Item = &'a RawPair>) -> RawMap {
    let mut merged = RawMap::new();
    for (seq, pair) in pairs.into_iter().enumerate() {
        let key = normalize_key(&pair.key);
        if pair.value.is_empty() {
            tracing::trace!("Skipping empty value for {key} from {}", pair.origin);
            continue;
        }
        if let Some(previous) = merged.get(&key) {
            tracing::trace!("{key}: {} overrides {}", pair.origin, previous.origin);
        }
        let value = RawValue { value: pair.value.clone(), origin: pair.origin.clone(), seq };
        merged.insert(key, value);
    }
    merged
}
