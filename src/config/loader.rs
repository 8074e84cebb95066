//! Config source loading
//!
//! Reads the config file (if any) and the prefixed environment variables and
//! returns them as raw pairs. Nothing here interprets values.

use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::env::{Environment, CONFIG_FILE_VAR, ENV_PREFIX};
use super::ini::IniDocument;
use crate::error::{ConfigError, Result};
use crate::schema::GLOBAL_SECTION;
use crate::utils::paths::{config_file_name, storage_dir};

/// Where a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The option's hard-coded schema default.
    Default,
    /// A config file section, by name.
    Section(String),
    /// An environment variable, by full variable name.
    Environment(String),
    /// An explicit command-line argument.
    CommandLine,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Default => f.write_str("default"),
            Origin::Section(name) => write!(f, "config section [{name}]"),
            Origin::Environment(var) => write!(f, "environment variable {var}"),
            Origin::CommandLine => f.write_str("command line"),
        }
    }
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An un-normalized key with its raw string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub key: String,
    pub value: String,
    pub origin: Origin,
}

impl RawPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>, origin: Origin) -> Self {
        Self { key: key.into(), value: value.into(), origin }
    }
}

/// Naming conventions for locating sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub env_prefix: String,
    pub config_file_var: String,
    /// File read when the override variable is unset or names no file.
    pub default_config_file: Option<PathBuf>,
}

impl SourceSettings {
    /// Standard settings, with the default file placed under the user's storage directory.
    pub fn for_environment(env: &Environment) -> Self {
        Self {
            env_prefix: ENV_PREFIX.to_string(),
            config_file_var: CONFIG_FILE_VAR.to_string(),
            default_config_file: storage_dir(|name| env.get(name).map(str::to_string))
                .map(|dir| dir.join(config_file_name())),
        }
    }

    pub fn default_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.default_config_file = path;
        self
    }
}

/// Raw pairs gathered for one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// The config file that was actually read.
    pub file: Option<PathBuf>,
    pub global: Vec<RawPair>,
    pub command: Vec<RawPair>,
    pub environment: Vec<RawPair>,
}

/// Pick the single config file to read.
///
/// The override variable wins when it names an existing file; otherwise the
/// default path is returned whether or not it exists.
pub fn locate_config_file(env: &Environment, settings: &SourceSettings) -> Option<PathBuf> {
    if let Some(path) = env.get(&settings.config_file_var).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
        tracing::debug!("{} names no file: {}", settings.config_file_var, path.display());
    }
    settings.default_config_file.clone()
}

/// Read and parse a config file. A missing file yields `Ok(None)`.
pub fn read_config_file(path: &Path) -> Result<Option<IniDocument>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("No config file at {}", path.display());
            return Ok(None);
        }
        Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
    };

    IniDocument::parse(&content).map(Some).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        line: err.line,
        message: err.message,
    })
}

/// Prefixed environment variables as raw pairs, prefix stripped and key lower-cased.
///
/// The config file override variable only selects the file and is skipped.
pub fn environment_pairs(env: &Environment, settings: &SourceSettings) -> Vec<RawPair> {
    env.with_prefix(&settings.env_prefix)
        .filter(|(name, _, _)| *name != settings.config_file_var)
        .map(|(name, key, value)| RawPair::new(key, value, Origin::Environment(name.to_string())))
        .collect()
}

/// Load the global section, the `section` section and the environment pairs.
///
/// `section` names the active command; passing [`GLOBAL_SECTION`] loads the
/// global section alone.
pub fn load_sources(
    env: &Environment,
    settings: &SourceSettings,
    section: &str,
) -> Result<ConfigSources> {
    let mut sources = ConfigSources::default();

    if let Some(path) = locate_config_file(env, settings) {
        if let Some(doc) = read_config_file(&path)? {
            tracing::debug!("Loaded config file {}", path.display());
            sources.global = section_pairs(&doc, GLOBAL_SECTION);
            if section != GLOBAL_SECTION {
                if !doc.has_section(section) {
                    tracing::trace!("No [{section}] section in {}", path.display());
                }
                sources.command = section_pairs(&doc, section);
            }
            sources.file = Some(path);
        }
    }

    sources.environment = environment_pairs(env, settings);
    tracing::debug!(
        global = sources.global.len(),
        command = sources.command.len(),
        environment = sources.environment.len(),
        "Collected raw config pairs for [{section}]"
    );
    Ok(sources)
}

fn section_pairs(doc: &IniDocument, name: &str) -> Vec<RawPair> {
    doc.section_items(name)
        .into_iter()
        .map(|(key, value)| RawPair::new(key, value, Origin::Section(name.to_string())))
        .collect()
}
