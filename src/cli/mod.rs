//! Command-line interface for pipconf
//!
//! Declares the command tree from the option registry, resolves defaults for
//! the chosen command and applies explicit command-line values on top.

use anyhow::{bail, Result};
use clap::ArgMatches;
use std::ffi::OsString;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pipconf::config::{Environment, Resolver};
use pipconf::error::{SUCCESS, USAGE_ERROR};
use pipconf::schema::registry;

mod command;
mod help;
mod overlay;
mod report;

use command::{build_command, CONFIG_COMMAND, HELP_COMMAND};
use overlay::apply_command_line;

pub fn run() -> Result<u8> {
    run_with(std::env::args_os(), Environment::capture())
}

/// Parse `args` and run the selected command against `env`.
///
/// Returns the process exit status. Configuration errors are returned as
/// errors so the caller can map them to their reserved status.
pub fn run_with<I, T>(args: I, env: Environment) -> Result<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let registry = registry();
    let matches = match build_command(registry, None).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            err.print()?;
            return Ok(u8::try_from(err.exit_code()).unwrap_or(USAGE_ERROR));
        }
    };

    let (name, sub) = match matches.subcommand() {
        Some((name, sub)) => (Some(name), sub),
        None => (None, &matches),
    };
    init_logging(sub);

    let resolver = Resolver::new(registry, env);

    if sub.get_flag("version") {
        println!("pipconf {}", clap::crate_version!());
        return Ok(SUCCESS);
    }

    match name {
        Some(HELP_COMMAND) => {
            let target = sub.get_one::<String>("command").map(String::as_str);
            print!("{}", help::render_help(&resolver, target)?);
        }
        Some(CONFIG_COMMAND) => {
            let target = sub.get_one::<String>("command").map(String::as_str);
            if let Some(target) = target {
                if registry.find_command(target).is_none() {
                    bail!("unknown command \"{target}\"");
                }
            }
            let defaults = resolver.resolve(target)?;
            if sub.get_flag("json") {
                println!("{}", report::format_json(&defaults)?);
            } else {
                print!("{}", report::format_options(&defaults));
            }
        }
        None => print!("{}", help::render_help(&resolver, None)?),
        Some(command) if sub.get_flag("help") => {
            print!("{}", help::render_help(&resolver, Some(command))?)
        }
        Some(command) => {
            let mut defaults = resolver.resolve(Some(command))?;
            apply_command_line(&mut defaults, &registry.active_options(Some(command)), sub);
            print!("{}", report::format_options(&defaults));
            if let Some(args) = sub.try_get_many::<String>("args").ok().flatten() {
                println!("arguments = {}", args.cloned().collect::<Vec<_>>().join(" "));
            }
        }
    }

    Ok(SUCCESS)
}

/// Wire `-v`/`-q` to the tracing log level.
///
/// The flag level (WARN by default, DEBUG for `-v`, TRACE for `-vv`, ERROR
/// for `-q`) replaces any bare level in RUST_LOG. Target-specific RUST_LOG
/// directives such as `pipconf::config=trace` still apply.
fn init_logging(matches: &ArgMatches) {
    let level = match (matches.get_count("verbose"), matches.get_count("quiet")) {
        (_, q) if q > 0 => Level::ERROR,
        (0, _) => Level::WARN,
        (1, _) => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
