//! Option schema registry
//!
//! Static description of every option the CLI recognizes. The registry is
//! declared once by the command-line layer and only read afterwards.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub mod builtin;

pub use builtin::registry;

/// Name of the config section (and parser) holding options for every command.
pub const GLOBAL_SECTION: &str = "global";

/// Declared value kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// On/off switch.
    Flag,
    /// Repeatable switch whose value is the number of occurrences.
    Counter,
    /// Free-form string.
    Str,
    /// Floating point number.
    Float,
    /// Ordered list of strings; repeats append.
    StrList,
    /// Ordered list of members drawn from a fixed choice set; repeats append.
    Choice(&'static [&'static str]),
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// No value at all (the option has no default).
    Unset,
    Flag(bool),
    Count(u8),
    Str(String),
    Float(f64),
    List(Vec<String>),
}

impl OptionValue {
    pub fn as_count(&self) -> Option<u8> {
        match self {
            OptionValue::Count(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Unset => Ok(()),
            OptionValue::Flag(value) => write!(f, "{value}"),
            OptionValue::Count(value) => write!(f, "{value}"),
            OptionValue::Str(value) => f.write_str(value),
            // Debug keeps the fractional part: 20.0 rather than 20
            OptionValue::Float(value) => write!(f, "{value:?}"),
            OptionValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Schema entry for one configurable option.
///
/// Constructed through the kind-specific constructors and refined with the
/// builder methods:
///
/// ```
/// use pipconf::schema::{OptionDescriptor, OptionValue};
///
/// let timeout = OptionDescriptor::float("timeout", 15.0)
///     .alias("default-timeout")
///     .metavar("SECONDS")
///     .help("Set the socket timeout (default {default} seconds)");
/// assert!(timeout.matches_long("--default-timeout"));
/// assert_eq!(timeout.default, OptionValue::Float(15.0));
/// ```
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    /// Canonical name: the long flag without its leading dashes.
    pub name: &'static str,
    pub short: Option<char>,
    /// Extra long spellings, without leading dashes.
    pub aliases: Vec<&'static str>,
    pub kind: ValueKind,
    pub default: OptionValue,
    /// Whether an explicit empty string is accepted on the command line.
    pub allow_empty: bool,
    pub metavar: Option<&'static str>,
    /// Help template; `{default}` expands to the current effective default.
    pub help: &'static str,
    pub hidden: bool,
}

impl OptionDescriptor {
    fn new(name: &'static str, kind: ValueKind, default: OptionValue) -> Self {
        Self {
            name,
            short: None,
            aliases: Vec::new(),
            kind,
            default,
            allow_empty: false,
            metavar: None,
            help: "",
            hidden: false,
        }
    }

    /// Boolean switch defaulting to `false`.
    pub fn flag(name: &'static str) -> Self {
        Self::new(name, ValueKind::Flag, OptionValue::Flag(false))
    }

    /// Occurrence counter defaulting to zero.
    pub fn counter(name: &'static str) -> Self {
        Self::new(name, ValueKind::Counter, OptionValue::Count(0))
    }

    /// String option without a default.
    pub fn string(name: &'static str) -> Self {
        Self::new(name, ValueKind::Str, OptionValue::Unset)
    }

    pub fn float(name: &'static str, default: f64) -> Self {
        Self::new(name, ValueKind::Float, OptionValue::Float(default))
    }

    /// String list defaulting to an empty list.
    pub fn list(name: &'static str) -> Self {
        Self::new(name, ValueKind::StrList, OptionValue::List(Vec::new()))
    }

    /// Accumulating choice option defaulting to an empty list.
    pub fn choice(name: &'static str, choices: &'static [&'static str]) -> Self {
        Self::new(name, ValueKind::Choice(choices), OptionValue::List(Vec::new()))
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Set a string default. An empty default also permits empty values.
    pub fn default_str(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        if default.is_empty() {
            self.allow_empty = true;
        }
        self.default = OptionValue::Str(default);
        self
    }

    pub fn metavar(mut self, metavar: &'static str) -> Self {
        self.metavar = Some(metavar);
        self
    }

    pub fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Every long spelling of this option, canonical first.
    pub fn long_flags(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied()).map(|n| format!("--{n}"))
    }

    /// Whether `key` is one of this option's long spellings.
    pub fn matches_long(&self, key: &str) -> bool {
        match key.strip_prefix("--") {
            Some(bare) => self.name == bare || self.aliases.contains(&bare),
            None => false,
        }
    }

    /// Help text with `{default}` replaced by `current`.
    pub fn expand_help(&self, current: &OptionValue) -> String {
        self.help.replace("{default}", &current.to_string())
    }
}

/// One command and the options it adds to the general group.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    /// Name of the trailing positional arguments, if the command takes any.
    pub positional: Option<&'static str>,
    pub options: Vec<OptionDescriptor>,
}

impl CommandSpec {
    pub fn new(name: &'static str, summary: &'static str) -> Self {
        Self { name, summary, usage: "", positional: None, options: Vec::new() }
    }

    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    pub fn positional(mut self, name: &'static str) -> Self {
        self.positional = Some(name);
        self
    }

    pub fn option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }
}

/// The full set of recognized options: a general group plus per-command groups.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub general: Vec<OptionDescriptor>,
    pub commands: Vec<CommandSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general_option(mut self, option: OptionDescriptor) -> Self {
        self.general.push(option);
        self
    }

    pub fn command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Options active while `command` runs: the general group, then the command's own.
    ///
    /// `None` (or an unknown command) yields the general group alone.
    pub fn active_options(&self, command: Option<&str>) -> OptionSet<'_> {
        let own = command.and_then(|name| self.find_command(name)).map(|c| c.options.as_slice());
        OptionSet {
            descriptors: self.general.iter().chain(own.unwrap_or_default()).collect(),
        }
    }

    /// Long spellings declared more than once within any active option set.
    pub fn duplicate_flags(&self) -> Vec<String> {
        let mut duplicates = Vec::new();
        let mut sets = vec![self.active_options(None)];
        sets.extend(self.commands.iter().map(|c| self.active_options(Some(c.name))));
        for set in sets {
            let mut seen: BTreeMap<String, usize> = BTreeMap::new();
            for flag in set.iter().flat_map(|d| d.long_flags()) {
                *seen.entry(flag).or_default() += 1;
            }
            duplicates.extend(seen.into_iter().filter(|(_, n)| *n > 1).map(|(flag, _)| flag));
        }
        duplicates.sort();
        duplicates.dedup();
        duplicates
    }
}

/// The ordered option descriptors active for one resolution pass.
#[derive(Debug, Clone)]
pub struct OptionSet<'a> {
    descriptors: Vec<&'a OptionDescriptor>,
}

impl<'a> OptionSet<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a OptionDescriptor> + '_ {
        self.descriptors.iter().copied()
    }

    /// Look an option up by any long spelling. Short spellings never match.
    pub fn find_long(&self, key: &str) -> Option<&'a OptionDescriptor> {
        self.descriptors.iter().copied().find(|d| d.matches_long(key))
    }
}
