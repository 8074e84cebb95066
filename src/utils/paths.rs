//! Per-user storage locations

use std::path::PathBuf;

/// Directory holding the per-user config and log files.
///
/// `lookup` resolves an environment variable, so callers can pass either the
/// process environment or an injected snapshot.
pub fn storage_dir(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        lookup("APPDATA").map(|appdata| PathBuf::from(appdata).join("pip"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        lookup("HOME").map(|home| PathBuf::from(home).join(".pip"))
    }
}

/// File name of the per-user config file inside [`storage_dir`].
pub fn config_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "pip.ini"
    } else {
        "pip.conf"
    }
}

/// Default log file, resolved against the process environment.
pub fn default_log_file() -> String {
    storage_dir(|name| std::env::var(name).ok())
        .map(|dir| dir.join("pip.log").display().to_string())
        .unwrap_or_else(|| "pip.log".to_string())
}
