//! pipconf: resolve command-line option defaults from config files and the environment
//!
//! Prints the effective options each command would run with, after merging
//! the config file, `PIP_*` environment variables and explicit arguments.

use std::process::ExitCode;

use pipconf::error::ERROR;
use pipconf::ConfigError;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            if let Some(config_err) = err.downcast_ref::<ConfigError>() {
                eprintln!("An error occurred during configuration: {config_err}");
                return ExitCode::from(config_err.exit_code());
            }
            eprintln!("ERROR: {err:#}");
            ExitCode::from(ERROR)
        }
    }
}
