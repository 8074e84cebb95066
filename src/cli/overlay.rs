//! Applies explicit command-line values on top of resolved defaults.

use clap::parser::ValueSource;
use clap::ArgMatches;

use pipconf::config::Defaults;
use pipconf::schema::{OptionSet, OptionValue, ValueKind};

/// Overlay every option the user actually typed.
///
/// Only values whose source is the command line count; clap's own implicit
/// defaults never reach the table.
pub fn apply_command_line(defaults: &mut Defaults, options: &OptionSet<'_>, matches: &ArgMatches) {
    for descriptor in options.iter() {
        let name = descriptor.name;
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        match descriptor.kind {
            ValueKind::Flag => defaults.apply_flag(name),
            ValueKind::Counter => defaults.apply_count(name, matches.get_count(name)),
            ValueKind::Str => {
                if let Some(value) = matches.get_one::<String>(name) {
                    defaults.apply_value(name, OptionValue::Str(value.clone()));
                }
            }
            ValueKind::Float => {
                if let Some(value) = matches.get_one::<f64>(name) {
                    defaults.apply_value(name, OptionValue::Float(*value));
                }
            }
            ValueKind::StrList | ValueKind::Choice(_) => {
                if let Some(values) = matches.get_many::<String>(name) {
                    defaults.apply_appended(name, values.cloned());
                }
            }
        }
        tracing::debug!("{name} set on the command line");
    }
}
