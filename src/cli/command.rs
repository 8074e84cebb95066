//! clap command tree generated from the option registry.

use clap::builder::{NonEmptyStringValueParser, PossibleValuesParser};
use clap::{value_parser, Arg, ArgAction, Command};

use pipconf::config::Defaults;
use pipconf::schema::{OptionDescriptor, Registry, ValueKind};

/// Binary-only subcommand rendering help for a command.
pub const HELP_COMMAND: &str = "help";

/// Binary-only subcommand reporting resolved defaults.
pub const CONFIG_COMMAND: &str = "config";

/// Build the full command tree.
///
/// `current` supplies the effective defaults substituted into help texts;
/// without it the schema defaults are used.
pub fn build_command(registry: &Registry, current: Option<&Defaults>) -> Command {
    let mut root = Command::new("pipconf")
        .about("Resolve command-line option defaults from config files and the environment")
        .override_usage("pipconf <COMMAND> [OPTIONS]")
        .disable_help_flag(true)
        .disable_help_subcommand(true)
        .disable_version_flag(true)
        .next_help_heading("General Options");

    for descriptor in &registry.general {
        root = root.arg(build_arg(descriptor, current).global(true));
    }

    for spec in &registry.commands {
        let mut sub = Command::new(spec.name)
            .about(spec.summary)
            .disable_help_flag(true)
            .next_help_heading("Command Options");
        if !spec.usage.is_empty() {
            sub = sub.override_usage(spec.usage);
        }
        for descriptor in &spec.options {
            sub = sub.arg(build_arg(descriptor, current));
        }
        if let Some(positional) = spec.positional {
            sub = sub.arg(
                Arg::new("args").value_name(positional).num_args(0..).action(ArgAction::Append),
            );
        }
        root = root.subcommand(sub);
    }

    root.subcommand(
        Command::new(HELP_COMMAND)
            .about("Show help for commands")
            .disable_help_flag(true)
            .arg(Arg::new("command").value_name("COMMAND")),
    )
    .subcommand(
        Command::new(CONFIG_COMMAND)
            .about("Show the option defaults resolved from config files and the environment")
            .disable_help_flag(true)
            .arg(Arg::new("command").value_name("COMMAND"))
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Print the resolved defaults as JSON"),
            ),
    )
}

fn build_arg(descriptor: &OptionDescriptor, current: Option<&Defaults>) -> Arg {
    let value = current.and_then(|d| d.value(descriptor.name)).unwrap_or(&descriptor.default);

    let mut arg = Arg::new(descriptor.name)
        .long(descriptor.name)
        .help(descriptor.expand_help(value))
        .hide(descriptor.hidden);
    if let Some(short) = descriptor.short {
        arg = arg.short(short);
    }
    if !descriptor.aliases.is_empty() {
        arg = arg.visible_aliases(descriptor.aliases.iter().copied());
    }
    if let Some(metavar) = descriptor.metavar {
        arg = arg.value_name(metavar);
    }

    match descriptor.kind {
        ValueKind::Flag => arg.action(ArgAction::SetTrue),
        ValueKind::Counter => arg.action(ArgAction::Count),
        ValueKind::Str if descriptor.allow_empty => arg.action(ArgAction::Set),
        ValueKind::Str => arg.action(ArgAction::Set).value_parser(NonEmptyStringValueParser::new()),
        ValueKind::Float => arg.action(ArgAction::Set).value_parser(value_parser!(f64)),
        ValueKind::StrList => arg.action(ArgAction::Append),
        ValueKind::Choice(choices) => arg
            .action(ArgAction::Append)
            .value_parser(PossibleValuesParser::new(choices.iter().copied())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipconf::schema::registry;

    #[test]
    fn test_command_tree_is_valid() {
        build_command(registry(), None).debug_assert();
    }

    #[test]
    fn test_every_registry_command_is_a_subcommand() {
        let cmd = build_command(registry(), None);
        for spec in &registry().commands {
            assert!(cmd.find_subcommand(spec.name).is_some(), "missing {}", spec.name);
        }
        assert!(cmd.find_subcommand(HELP_COMMAND).is_some());
        assert!(cmd.find_subcommand(CONFIG_COMMAND).is_some());
    }

    #[test]
    fn test_aliases_accepted() {
        let args = ["pipconf", "list", "--default-timeout", "3", "--pypi-url", "http://x/"];
        let matches = build_command(registry(), None).try_get_matches_from(args).expect("parse");
        let (_, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(sub.get_one::<f64>("timeout"), Some(&3.0));
        assert_eq!(sub.get_one::<String>("index-url").map(String::as_str), Some("http://x/"));
    }

    #[test]
    fn test_invalid_choice_rejected() {
        let result = build_command(registry(), None)
            .try_get_matches_from(["pipconf", "list", "--exists-action", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_string_only_where_allowed() {
        let cmd = || build_command(registry(), None);
        assert!(cmd().try_get_matches_from(["pipconf", "list", "--proxy", ""]).is_ok());
        assert!(cmd().try_get_matches_from(["pipconf", "list", "--log", ""]).is_err());
    }

    #[test]
    fn test_help_text_uses_current_defaults() {
        let registry = registry();
        let mut defaults = Defaults::seeded(&registry.active_options(None));
        defaults.apply_value("timeout", pipconf::OptionValue::Float(5.0));
        let mut cmd = build_command(registry, Some(&defaults)).term_width(0);
        let help = cmd.render_long_help().to_string();
        assert!(help.contains("(default 5.0 seconds)"), "{help}");
    }
}
