//! The builtin option registry for the `pipconf` command line.

use once_cell::sync::Lazy;

use super::{CommandSpec, OptionDescriptor, Registry};
use crate::utils::paths::default_log_file;

const EXISTS_ACTIONS: &[&str] = &["s", "i", "w", "b"];

static BUILTIN: Lazy<Registry> = Lazy::new(build);

/// The process-wide registry, built on first use and never mutated.
pub fn registry() -> &'static Registry {
    &BUILTIN
}

fn build() -> Registry {
    Registry::new()
        .general_option(OptionDescriptor::flag("help").short('h').help("Show help"))
        .general_option(
            OptionDescriptor::flag("require-virtualenv")
                .alias("require-venv")
                .help("Run only if inside a virtualenv")
                .hidden(),
        )
        .general_option(OptionDescriptor::counter("verbose").short('v').help("Give more output"))
        .general_option(
            OptionDescriptor::flag("version").short('V').help("Show version and exit"),
        )
        .general_option(OptionDescriptor::counter("quiet").short('q').help("Give less output"))
        .general_option(
            OptionDescriptor::string("log")
                .metavar("FILENAME")
                .help("Log file where a complete (maximum verbosity) record will be kept"),
        )
        .general_option(
            OptionDescriptor::flag("log-explicit-levels")
                .help("Write the log level of every record explicitly")
                .hidden(),
        )
        .general_option(
            OptionDescriptor::string("local-log")
                .alias("log-file")
                .metavar("FILENAME")
                .default_str(default_log_file())
                .help("Default log file")
                .hidden(),
        )
        .general_option(
            OptionDescriptor::flag("no-input").help("Don't ask for input").hidden(),
        )
        .general_option(
            OptionDescriptor::string("proxy")
                .metavar("PROXY")
                .default_str("")
                .help(
                    "Specify a proxy in the form user:passwd@proxy.server:port. \
                     The user:passwd@ part is optional.",
                ),
        )
        .general_option(
            OptionDescriptor::float("timeout", 15.0)
                .alias("default-timeout")
                .metavar("SECONDS")
                .help("Set the socket timeout (default {default} seconds)"),
        )
        .general_option(
            OptionDescriptor::string("default-vcs")
                .default_str("")
                .help("Default version control system for editables")
                .hidden(),
        )
        .general_option(
            OptionDescriptor::string("skip-requirements-regex")
                .default_str("")
                .help("A regex used to skip requirements")
                .hidden(),
        )
        .general_option(
            OptionDescriptor::choice("exists-action", EXISTS_ACTIONS)
                .metavar("ACTION")
                .help(
                    "Default action when a path already exists. Repeat to give fallbacks: \
                     (s)witch, (i)gnore, (w)ipe, (b)ackup",
                ),
        )
        .command(list_command())
        .command(uninstall_command())
}

fn list_command() -> CommandSpec {
    CommandSpec::new("list", "List all currently installed packages")
        .usage("pipconf list [OPTIONS]")
        .option(
            OptionDescriptor::flag("local")
                .short('l')
                .help("If in a virtualenv, do not report globally-installed packages"),
        )
        .option(
            OptionDescriptor::flag("outdated")
                .short('o')
                .help("Output all currently installed outdated packages"),
        )
        .option(
            OptionDescriptor::flag("uptodate")
                .short('u')
                .help("Output all currently installed uptodate packages"),
        )
        .option(
            OptionDescriptor::list("find-links")
                .short('f')
                .metavar("URL")
                .help("URL to look for packages at"),
        )
        .option(
            OptionDescriptor::string("index-url")
                .short('i')
                .alias("pypi-url")
                .metavar("URL")
                .default_str("http://pypi.python.org/simple/")
                .help("Base URL of Python Package Index (default {default})"),
        )
        .option(
            OptionDescriptor::list("extra-index-url")
                .metavar("URL")
                .help("Extra URLs of package indexes to use in addition to --index-url"),
        )
        .option(
            OptionDescriptor::flag("no-index")
                .help("Ignore package index (only looking at --find-links URLs instead)"),
        )
        .option(
            OptionDescriptor::flag("use-mirrors")
                .short('M')
                .help("Use the PyPI mirrors as a fallback in case the main index is down"),
        )
        .option(
            OptionDescriptor::list("mirrors")
                .metavar("URL")
                .help("Specific mirror URLs to query when --use-mirrors is used"),
        )
}

fn uninstall_command() -> CommandSpec {
    CommandSpec::new("uninstall", "Uninstall packages")
        .usage("pipconf uninstall [OPTIONS] PACKAGE_NAMES ...")
        .positional("PACKAGE_NAMES")
        .option(
            OptionDescriptor::list("requirement")
                .short('r')
                .metavar("FILENAME")
                .help(
                    "Uninstall all the packages listed in the given requirements file. \
                     This option can be used multiple times.",
                ),
        )
        .option(
            OptionDescriptor::flag("yes")
                .short('y')
                .help("Don't ask for confirmation of uninstall deletions"),
        )
}
