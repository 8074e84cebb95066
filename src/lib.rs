//! pipconf: option defaults from config files and environment variables
//!
//! The library resolves the effective default of every declared command-line
//! option. Values come from the `[global]` and per-command sections of an INI
//! config file and from `PIP_`-prefixed environment variables; the caller's
//! argument parser applies explicit command-line values last.
//!
//! ```no_run
//! use pipconf::config::{Environment, Resolver};
//! use pipconf::schema::registry;
//!
//! let resolver = Resolver::new(registry(), Environment::capture());
//! let defaults = resolver.resolve(Some("list"))?;
//! println!("timeout = {}", defaults.value("timeout").expect("declared"));
//! # Ok::<(), pipconf::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod schema;
pub mod utils;

pub use config::{Defaults, Environment, Origin, Resolver};
pub use error::{ConfigError, Result};
pub use schema::{OptionDescriptor, OptionValue, Registry, ValueKind};
