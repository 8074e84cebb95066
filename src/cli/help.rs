//! Help rendering with freshly resolved defaults.

use anyhow::{bail, Result};

use super::command::build_command;
use pipconf::config::Resolver;

const DEFAULT_HELP_WIDTH: usize = 78;

/// Render help for `command` (the general parser when `None`).
///
/// Runs a new resolution pass first, so the defaults shown reflect the config
/// file and environment as they are right now.
pub fn render_help(resolver: &Resolver<'_>, command: Option<&str>) -> Result<String> {
    // help and config have no config section of their own
    let section = command.filter(|name| resolver.registry().find_command(name).is_some());
    let defaults = resolver.resolve(section)?;

    let mut root =
        build_command(resolver.registry(), Some(&defaults)).term_width(help_width(resolver));
    root.build();

    let target = match command {
        Some(name) => match root.find_subcommand_mut(name) {
            Some(sub) => sub,
            None => bail!("unknown command \"{name}\""),
        },
        None => &mut root,
    };
    Ok(target.render_long_help().to_string())
}

/// `COLUMNS - 2` when set, a fixed width otherwise.
fn help_width(resolver: &Resolver<'_>) -> usize {
    resolver
        .environment()
        .get("COLUMNS")
        .and_then(|c| c.trim().parse::<usize>().ok())
        .map(|c| c.saturating_sub(2))
        .unwrap_or(DEFAULT_HELP_WIDTH)
}
