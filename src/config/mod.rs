//! Configuration resolution
//!
//! Computes option defaults from a config file and environment variables with
//! fixed precedence (Env > command section > global section > schema default).
//! Command-line values are applied on top by the caller.

pub mod coerce;
pub mod defaults;
pub mod env;
pub mod ini;
pub mod loader;
pub mod merge;
pub mod normalize;

pub use coerce::{coerce, parse_bool};
pub use defaults::{materialize, Defaults, Resolved, Resolver};
pub use env::{Environment, CONFIG_FILE_VAR, ENV_PREFIX};
pub use loader::{load_sources, locate_config_file, ConfigSources, Origin, RawPair, SourceSettings};
pub use merge::{merge_sources, RawMap, RawValue};
pub use normalize::normalize_key;
