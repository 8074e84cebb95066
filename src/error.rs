//! Error types for configuration resolution.
//!
//! Every failure the resolution engine can produce is fatal to the pass that
//! raised it. Missing files, unknown keys and empty values are not errors and
//! never reach this type.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::Origin;

/// Process exit status for a successful run.
pub const SUCCESS: u8 = 0;

/// Process exit status for a general failure.
pub const ERROR: u8 = 1;

/// Process exit status for a usage or argument-parsing failure (clap's own status).
pub const USAGE_ERROR: u8 = 2;

/// Process exit status reserved for configuration errors.
pub const CONFIG_ERROR: u8 = 3;

/// Errors that abort a resolution pass.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed reading config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid INI.
    #[error("{}:{line}: {message}", .path.display())]
    Parse { path: PathBuf, line: usize, message: String },

    /// A raw value could not be converted to the option's declared kind.
    #[error("invalid value {value:?} for {key} (from {origin}): {reason}")]
    InvalidValue { key: String, value: String, origin: Origin, reason: String },
}

impl ConfigError {
    /// Exit status the binary terminates with when this error escapes.
    pub fn exit_code(&self) -> u8 {
        CONFIG_ERROR
    }
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
