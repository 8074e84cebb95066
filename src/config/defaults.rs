//! Defaults materialization
//!
//! Turns schema defaults plus config file and environment values into the
//! typed default table consumed by the argument parser. Every call builds a
//! fresh table; nothing is cached between passes.

use serde::Serialize;
use std::collections::BTreeMap;

use super::coerce::coerce;
use super::env::Environment;
use super::loader::{load_sources, ConfigSources, Origin, SourceSettings};
use super::merge::merge_sources;
use crate::error::Result;
use crate::schema::{OptionSet, OptionValue, Registry, GLOBAL_SECTION};

/// A typed value and the source that supplied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub value: OptionValue,
    pub origin: Origin,
}

/// Canonical option name to resolved value, for one option set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Defaults {
    entries: BTreeMap<String, Resolved>,
}

impl Defaults {
    /// Every option at its hard-coded schema default.
    pub fn seeded(options: &OptionSet<'_>) -> Self {
        let entries = options
            .iter()
            .map(|d| {
                (d.name.to_string(), Resolved { value: d.default.clone(), origin: Origin::Default })
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Resolved> {
        self.entries.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&OptionValue> {
        self.get(name).map(|r| &r.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolved)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace a known option's value. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: OptionValue, origin: Origin) {
        if let Some(entry) = self.entries.get_mut(name) {
            *entry = Resolved { value, origin };
        }
    }

    /// Command-line switch given: the flag becomes true.
    pub fn apply_flag(&mut self, name: &str) {
        self.set(name, OptionValue::Flag(true), Origin::CommandLine);
    }

    /// Command-line counter given `occurrences` times, added to the resolved count.
    pub fn apply_count(&mut self, name: &str, occurrences: u8) {
        let base = self.value(name).and_then(OptionValue::as_count).unwrap_or(0);
        self.set(name, OptionValue::Count(base.saturating_add(occurrences)), Origin::CommandLine);
    }

    /// Command-line values appended after the resolved sequence.
    pub fn apply_appended(&mut self, name: &str, items: impl IntoIterator<Item = String>) {
        let mut list =
            self.value(name).and_then(OptionValue::as_list).map(|l| l.to_vec()).unwrap_or_default();
        list.extend(items);
        self.set(name, OptionValue::List(list), Origin::CommandLine);
    }

    /// Command-line value replacing the resolved one.
    pub fn apply_value(&mut self, name: &str, value: OptionValue) {
        self.set(name, value, Origin::CommandLine);
    }
}

/// Build the default table for `options` from already-loaded sources.
///
/// Keys matching no option are ignored. When two spellings of one option are
/// both present, the one written later in precedence order wins.
pub fn materialize(options: &OptionSet<'_>, sources: &ConfigSources) -> Result<Defaults> {
    let mut defaults = Defaults::seeded(options);
    let merged = merge_sources(sources);

    let mut matched: Vec<_> = merged
        .iter()
        .filter_map(|(key, raw)| match options.find_long(key) {
            Some(descriptor) => Some((descriptor, key, raw)),
            None => {
                tracing::trace!("Ignoring unknown config key {key} from {}", raw.origin);
                None
            }
        })
        .collect();
    matched.sort_by_key(|(_, _, raw)| raw.seq);

    for (descriptor, key, raw) in matched {
        if let Some(value) = coerce(descriptor, key, &raw.value, &raw.origin)? {
            tracing::debug!("{} = {} (from {})", descriptor.name, value, raw.origin);
            defaults.set(descriptor.name, value, raw.origin.clone());
        }
    }

    Ok(defaults)
}

/// Resolves option defaults for a registry against an injected environment.
#[derive(Debug, Clone)]
pub struct Resolver<'r> {
    registry: &'r Registry,
    env: Environment,
    settings: Option<SourceSettings>,
}

impl<'r> Resolver<'r> {
    /// Long spellings declared twice are reported; lookups use the first declaration.
    pub fn new(registry: &'r Registry, env: Environment) -> Self {
        for flag in registry.duplicate_flags() {
            tracing::warn!("{flag} is declared by more than one option");
        }
        Self { registry, env, settings: None }
    }

    /// Use fixed source settings instead of deriving them from the environment.
    pub fn with_settings(mut self, settings: SourceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Run one full resolution pass for `command` (`None` for the general parser).
    ///
    /// The config file is located and read again on every call.
    pub fn resolve(&self, command: Option<&str>) -> Result<Defaults> {
        let section = command.unwrap_or(GLOBAL_SECTION);
        let settings =
            self.settings.clone().unwrap_or_else(|| SourceSettings::for_environment(&self.env));
        let sources = load_sources(&self.env, &settings, section)?;
        materialize(&self.registry.active_options(command), &sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::RawPair;
    use crate::error::ConfigError;
    use crate::schema::{CommandSpec, OptionDescriptor};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn registry() -> Registry {
        Registry::new()
            .general_option(OptionDescriptor::counter("verbose").short('v'))
            .general_option(OptionDescriptor::float("timeout", 15.0).alias("default-timeout"))
            .general_option(OptionDescriptor::string("proxy").default_str(""))
            .general_option(OptionDescriptor::choice("exists-action", &["s", "i", "w", "b"]))
            .command(
                CommandSpec::new("list", "List packages")
                    .option(OptionDescriptor::flag("local"))
                    .option(OptionDescriptor::list("find-links")),
            )
    }

    fn resolver_for<'r>(
        registry: &'r Registry,
        config: &Path,
        env: &[(&str, &str)],
    ) -> Resolver<'r> {
        let env: Environment = env.iter().copied().collect();
        let settings =
            SourceSettings::for_environment(&env).default_config_file(Some(config.to_path_buf()));
        Resolver::new(registry, env).with_settings(settings)
    }

    fn write_config(tmp: &TempDir, content: &str) -> std::path::PathBuf {
        let path = tmp.path().join("pip.conf");
        fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn test_untouched_options_keep_schema_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let registry = registry();
        let defaults = resolver_for(&registry, &tmp.path().join("absent.conf"), &[])
            .resolve(Some("list"))
            .expect("resolve");
        assert_eq!(defaults.iter().count(), 6);
        for descriptor in registry.active_options(Some("list")).iter() {
            let resolved = defaults.get(descriptor.name).expect("seeded");
            assert_eq!(resolved.value, descriptor.default);
            assert_eq!(resolved.origin, Origin::Default);
        }
    }

    #[test]
    fn test_global_section_timeout() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout = 20\n");
        let registry = registry();
        let defaults = resolver_for(&registry, &path, &[]).resolve(None).expect("resolve");
        assert_eq!(defaults.value("timeout"), Some(&OptionValue::Float(20.0)));
    }

    #[test]
    fn test_environment_overrides_config_timeout() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout = 20\n");
        let registry = registry();
        let defaults =
            resolver_for(&registry, &path, &[("PIP_TIMEOUT", "5")]).resolve(None).expect("resolve");
        let timeout = defaults.get("timeout").expect("timeout");
        assert_eq!(timeout.value, OptionValue::Float(5.0));
        assert_eq!(timeout.origin, Origin::Environment("PIP_TIMEOUT".to_string()));
    }

    #[test]
    fn test_command_section_overrides_global() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout = 20\n[list]\ntimeout = 30\n");
        let registry = registry();
        let resolver = resolver_for(&registry, &path, &[]);
        let list = resolver.resolve(Some("list")).expect("list");
        assert_eq!(list.value("timeout"), Some(&OptionValue::Float(30.0)));
        let global = resolver.resolve(None).expect("global");
        assert_eq!(global.value("timeout"), Some(&OptionValue::Float(20.0)));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\nfoo-bar = 1\n");
        let registry = registry();
        let defaults = resolver_for(&registry, &path, &[("PIP_ALSO_UNKNOWN", "x")])
            .resolve(None)
            .expect("resolve");
        assert!(defaults.get("foo-bar").is_none());
        assert!(defaults.get("also-unknown").is_none());
    }

    #[test]
    fn test_command_options_ignored_outside_their_command() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\nlocal = yes\n");
        let registry = registry();
        let resolver = resolver_for(&registry, &path, &[]);
        assert!(resolver.resolve(None).expect("global").get("local").is_none());
        let list = resolver.resolve(Some("list")).expect("list");
        assert_eq!(list.value("local"), Some(&OptionValue::Flag(true)));
    }

    #[test]
    fn test_empty_environment_value_keeps_file_value() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout = 20\n");
        let registry = registry();
        let defaults =
            resolver_for(&registry, &path, &[("PIP_TIMEOUT", "")]).resolve(None).expect("resolve");
        assert_eq!(defaults.value("timeout"), Some(&OptionValue::Float(20.0)));
    }

    #[test]
    fn test_empty_file_value_keeps_schema_default() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout =\nproxy = \"\"\n");
        let registry = registry();
        let defaults = resolver_for(&registry, &path, &[]).resolve(None).expect("resolve");
        assert_eq!(defaults.get("timeout").map(|r| &r.origin), Some(&Origin::Default));
        assert_eq!(defaults.value("proxy"), Some(&OptionValue::Str(String::new())));
    }

    #[test]
    fn test_alias_spelling_later_in_precedence_wins() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout = 20\n");
        let registry = registry();
        let defaults = resolver_for(&registry, &path, &[("PIP_DEFAULT_TIMEOUT", "7")])
            .resolve(None)
            .expect("resolve");
        assert_eq!(defaults.value("timeout"), Some(&OptionValue::Float(7.0)));
    }

    #[test]
    fn test_bad_boolean_aborts_pass() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[list]\nlocal = maybe\n");
        let registry = registry();
        let err =
            resolver_for(&registry, &path, &[]).resolve(Some("list")).expect_err("should fail");
        match err {
            ConfigError::InvalidValue { key, origin, .. } => {
                assert_eq!(key, "--local");
                assert_eq!(origin, Origin::Section("list".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_multiline_list_value() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[list]\nfind-links =\n    http://a/\n    http://b/\n");
        let registry = registry();
        let defaults = resolver_for(&registry, &path, &[]).resolve(Some("list")).expect("resolve");
        assert_eq!(
            defaults.value("find-links"),
            Some(&OptionValue::List(vec!["http://a/".to_string(), "http://b/".to_string()]))
        );
    }

    #[test]
    fn test_exists_action_accumulates_command_line_after_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\nexists-action = s\n");
        let registry = registry();
        let mut defaults = resolver_for(&registry, &path, &[]).resolve(None).expect("resolve");
        defaults.apply_appended("exists-action", vec!["i".to_string()]);
        assert_eq!(
            defaults.value("exists-action"),
            Some(&OptionValue::List(vec!["s".to_string(), "i".to_string()]))
        );
    }

    #[test]
    fn test_higher_tier_replaces_choice_sequence() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\nexists-action = s w\n");
        let registry = registry();
        let defaults = resolver_for(&registry, &path, &[("PIP_EXISTS_ACTION", "b")])
            .resolve(None)
            .expect("resolve");
        assert_eq!(
            defaults.value("exists-action"),
            Some(&OptionValue::List(vec!["b".to_string()]))
        );
    }

    #[test]
    fn test_counter_from_config_then_command_line_increments() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\nverbose = yes\n");
        let registry = registry();
        let mut defaults = resolver_for(&registry, &path, &[]).resolve(None).expect("resolve");
        assert_eq!(defaults.value("verbose"), Some(&OptionValue::Count(1)));
        defaults.apply_count("verbose", 2);
        assert_eq!(defaults.value("verbose"), Some(&OptionValue::Count(3)));
        assert_eq!(defaults.get("verbose").map(|r| &r.origin), Some(&Origin::CommandLine));
    }

    #[test]
    fn test_each_pass_sees_current_environment_and_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(&tmp, "[global]\ntimeout = 20\n");
        let registry = registry();
        let mut resolver = resolver_for(&registry, &path, &[]);
        let timeout = |resolver: &Resolver<'_>| {
            resolver.resolve(None).expect("resolve").value("timeout").cloned()
        };
        assert_eq!(timeout(&resolver), Some(OptionValue::Float(20.0)));

        fs::write(&path, "[global]\ntimeout = 25\n").expect("rewrite");
        assert_eq!(timeout(&resolver), Some(OptionValue::Float(25.0)));

        resolver.environment_mut().set("PIP_TIMEOUT", "1");
        assert_eq!(timeout(&resolver), Some(OptionValue::Float(1.0)));
    }

    #[test]
    fn test_materialize_from_explicit_sources() {
        let registry = registry();
        let sources = ConfigSources {
            global: vec![RawPair::new("proxy", "p:1", Origin::Section("global".into()))],
            environment: vec![RawPair::new(
                "no_such",
                "1",
                Origin::Environment("PIP_NO_SUCH".into()),
            )],
            ..Default::default()
        };
        let defaults = materialize(&registry.active_options(None), &sources).expect("materialize");
        assert_eq!(defaults.value("proxy"), Some(&OptionValue::Str("p:1".to_string())));
        assert_eq!(defaults.iter().count(), 4);
    }

    #[test]
    fn test_config_file_variable_never_fills_an_option() {
        let tmp = TempDir::new().expect("tmp");
        let custom = write_config(&tmp, "[global]\ntimeout = 20\n");
        let registry = registry().general_option(OptionDescriptor::string("config-file"));
        let env = [("PIP_CONFIG_FILE", custom.to_str().expect("utf8"))];
        let defaults = resolver_for(&registry, &tmp.path().join("absent.conf"), &env)
            .resolve(None)
            .expect("resolve");
        assert_eq!(defaults.value("timeout"), Some(&OptionValue::Float(20.0)));
        let config_file = defaults.get("config-file").expect("seeded");
        assert_eq!(config_file.value, OptionValue::Unset);
        assert_eq!(config_file.origin, Origin::Default);
    }
}
