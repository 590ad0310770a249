//! Lint configuration composition.
//!
//! The default lint configuration is an ordered list of named layers. Each
//! layer is a [`ConfigEntry`] built by a pure function in [`layers`]; later
//! entries win when the linter merges them. Callers either replace the whole
//! list with a custom configuration, or tune the layers through [`RuleSets`]:
//! disable a layer, replace its entry, or append an `additional` entry. The
//! two modes are mutually exclusive.
//!
//! Known conflicts between enabled layers are resolved by the fixed table in
//! [`suppressions`].

pub mod layers;
pub mod suppressions;

use crate::error::{FandlError, Result};
use crate::package_settings::ProjectSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// A reference to a JavaScript module export, written `package` or
/// `package#member.path`.
///
/// The engine adapter turns it into an `import` of `package` followed by the
/// member lookups, e.g. `@eslint/js#configs.recommended.rules`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleRef {
    /// The package (or path) to import the default export from.
    pub package: String,
    /// Property lookups applied to the default export.
    pub member: Vec<String>,
}

impl ModuleRef {
    /// Parses the `package#member.path` form.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentInvalid` for an empty package or an empty member segment.
    pub fn parse(value: &str) -> Result<Self> {
        let (package, member) = match value.split_once('#') {
            Some((package, member)) => (package, Some(member)),
            None => (value, None),
        };
        if package.is_empty() {
            return Err(FandlError::argument_invalid(format!(
                "Module reference '{}' does not name a package.",
                value
            )));
        }
        let member = match member {
            Some(path) => path.split('.').map(String::from).collect::<Vec<_>>(),
            None => Vec::new(),
        };
        if member.iter().any(String::is_empty) {
            return Err(FandlError::argument_invalid(format!(
                "Module reference '{}' has an empty member segment.",
                value
            )));
        }
        Ok(Self {
            package: package.to_string(),
            member,
        })
    }
}

impl TryFrom<String> for ModuleRef {
    type Error = FandlError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ModuleRef> for String {
    fn from(value: ModuleRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.package)?;
        if !self.member.is_empty() {
            write!(f, "#{}", self.member.join("."))?;
        }
        Ok(())
    }
}

/// Parser settings of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOptions {
    /// `module`, `commonjs` or `script`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// ECMAScript version, usually `"latest"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<Value>,
    /// Global variable sets spread into `globals`, e.g. `globals#node`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_presets: Vec<ModuleRef>,
    /// Individual globals, applied after the presets.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub globals: Map<String, Value>,
    /// Options handed to the parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<Value>,
    /// Anything else, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a flat lint configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    /// Label shown by the linter's config tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Globs of files the entry applies to; all files when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Globs of files the entry does not apply to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignores: Option<Vec<String>>,
    /// Plugin namespace to plugin module.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, ModuleRef>,
    /// Parser settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_options: Option<LanguageOptions>,
    /// Shared plugin settings.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    /// Rule maps spread, in order, before `rules`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_presets: Vec<ModuleRef>,
    /// Rule ids removed from the presets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omit_rules: Vec<String>,
    /// Rule id to severity or `[severity, options...]`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub rules: Map<String, Value>,
    /// Anything else, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigEntry {
    /// Removes `rule` from this entry, including any preset contribution.
    pub fn omit_rule(&mut self, rule: &str) {
        self.rules.shift_remove(rule);
        if !self.omit_rules.iter().any(|r| r == rule) {
            self.omit_rules.push(rule.to_string());
        }
    }
}

/// The named layers of the default configuration, in composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerName {
    /// The linter's own recommended rules.
    BaseRecommended,
    /// Recommended rules of the stylistic plugin.
    Stylistic,
    /// Standard JS rules.
    #[serde(alias = "standardjs")]
    StandardJs,
    /// Local style choices on top of the stylistic rules.
    Style,
    /// Structural code smells.
    Smells,
    /// Complexity thresholds.
    Complexity,
    /// Rules catching needless serialization of async work.
    Efficiency,
    /// Bans on debugging statements.
    Debug,
    /// Node.js rules and globals; only when the project declares a node engine.
    Node,
    /// Documentation comment rules.
    Jsdoc,
    /// Plugin bindings and base rule tweaks.
    Base,
    /// JSX file overlay.
    Jsx,
    /// Test file overlay.
    Test,
}

impl LayerName {
    /// Every layer in composition order.
    pub const ALL: [Self; 13] = [
        Self::BaseRecommended,
        Self::Stylistic,
        Self::StandardJs,
        Self::Style,
        Self::Smells,
        Self::Complexity,
        Self::Efficiency,
        Self::Debug,
        Self::Node,
        Self::Jsdoc,
        Self::Base,
        Self::Jsx,
        Self::Test,
    ];

    /// The kebab-case name used in rule-set files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BaseRecommended => "base-recommended",
            Self::Stylistic => "stylistic",
            Self::StandardJs => "standard-js",
            Self::Style => "style",
            Self::Smells => "smells",
            Self::Complexity => "complexity",
            Self::Efficiency => "efficiency",
            Self::Debug => "debug",
            Self::Node => "node",
            Self::Jsdoc => "jsdoc",
            Self::Base => "base",
            Self::Jsx => "jsx",
            Self::Test => "test",
        }
    }

    /// Whether the layer can be listed in `disable`. `base`, `jsx` and `test`
    /// can only be replaced.
    pub fn can_disable(self) -> bool {
        !matches!(self, Self::Base | Self::Jsx | Self::Test)
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adjustments to the default layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSets {
    /// Layers left out entirely.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable: Vec<LayerName>,
    /// An entry appended after every layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<ConfigEntry>,
    /// Entries replacing the default entry of a layer.
    #[serde(flatten)]
    pub overrides: BTreeMap<LayerName, ConfigEntry>,
}

/// Inputs to [`compose`].
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    /// A complete custom configuration replacing every layer.
    pub eslint_config: Option<Vec<ConfigEntry>>,
    /// Adjustments to the default layers.
    pub rule_sets: Option<RuleSets>,
    /// Facts about the project being linted.
    pub project: ProjectSettings,
}

/// The configuration handed to the linter.
#[derive(Debug, Clone, PartialEq)]
pub enum LintConfig {
    /// Entries composed from the layers or loaded from a data file.
    Entries(Vec<ConfigEntry>),
    /// A JavaScript config module whose default export is used as is.
    ///
    /// Its plugins are live objects, so it is imported rather than read.
    Module(PathBuf),
}

impl From<Vec<ConfigEntry>> for LintConfig {
    fn from(entries: Vec<ConfigEntry>) -> Self {
        Self::Entries(entries)
    }
}

/// Builds the lint configuration.
///
/// # Errors
///
/// Returns `ArgumentInvalid` when both a custom configuration and rule sets are
/// given, or when `disable` names a layer that cannot be disabled.
///
/// # Examples
/// ```
/// use fandl_core::rule_sets::{compose, ComposeOptions};
///
/// let entries = compose(&ComposeOptions::default()).unwrap();
/// assert_eq!(entries[0].name.as_deref(), Some("fandl/base-recommended"));
/// ```
pub fn compose(options: &ComposeOptions) -> Result<Vec<ConfigEntry>> {
    if options.eslint_config.is_some() && options.rule_sets.is_some() {
        return Err(FandlError::argument_invalid(
            "You cannot define 'eslintConfig' and 'ruleSets' simultaneously.",
        ));
    }
    if let Some(custom) = &options.eslint_config {
        debug!("Using custom lint configuration with {} entries", custom.len());
        return Ok(custom.clone());
    }

    let rule_sets = options.rule_sets.clone().unwrap_or_default();
    if let Some(layer) = rule_sets.disable.iter().find(|l| !l.can_disable()) {
        return Err(FandlError::argument_invalid_with_hint(
            format!("Rule set '{}' cannot be disabled.", layer),
            format!("Override '{}' with a replacement entry instead.", layer),
        ));
    }

    let mut composed = Vec::new();
    for layer in LayerName::ALL {
        if let Some(replacement) = rule_sets.overrides.get(&layer) {
            composed.push(suppressions::ComposedLayer {
                layer,
                entry: replacement.clone(),
                is_default: false,
            });
        } else if !rule_sets.disable.contains(&layer)
            && let Some(entry) = layers::default_entry(layer, &options.project)
        {
            composed.push(suppressions::ComposedLayer {
                layer,
                entry,
                is_default: true,
            });
        }
    }

    suppressions::apply(&mut composed);

    let mut entries: Vec<ConfigEntry> = composed.into_iter().map(|c| c.entry).collect();
    if let Some(additional) = rule_sets.additional {
        entries.push(additional);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(entries: &[ConfigEntry]) -> Vec<String> {
        entries.iter().filter_map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_module_ref_parses_member_path() {
        let r = ModuleRef::parse("eslint-plugin-jsdoc#configs.flat/recommended-error.rules")
            .expect("valid reference");
        assert_eq!(r.package, "eslint-plugin-jsdoc");
        assert_eq!(r.member, vec!["configs", "flat/recommended-error", "rules"]);
        assert_eq!(r.to_string(), "eslint-plugin-jsdoc#configs.flat/recommended-error.rules");
    }

    #[test]
    fn test_module_ref_rejects_empty_parts() {
        assert!(ModuleRef::parse("#rules").is_err());
        assert!(ModuleRef::parse("pkg#a..b").is_err());
        assert_eq!(ModuleRef::parse("@scope/pkg").expect("valid").member, Vec::<String>::new());
    }

    #[test]
    fn test_default_composition_order_without_node_engine() {
        let entries = compose(&ComposeOptions::default()).expect("Failed to compose");
        assert_eq!(
            names(&entries),
            vec![
                "fandl/base-recommended",
                "fandl/stylistic",
                "fandl/standard-js",
                "fandl/style",
                "fandl/smells",
                "fandl/complexity",
                "fandl/efficiency",
                "fandl/debug",
                "fandl/jsdoc",
                "fandl/base",
                "fandl/jsx",
                "fandl/test",
            ]
        );
    }

    #[test]
    fn test_node_layer_included_when_engine_declared() {
        let options = ComposeOptions {
            project: ProjectSettings {
                declares_node_engine: true,
                ..ProjectSettings::default()
            },
            ..ComposeOptions::default()
        };
        let entries = compose(&options).expect("Failed to compose");
        let names = names(&entries);
        let node = names.iter().position(|n| n == "fandl/node").expect("node layer present");
        assert_eq!(names[node - 1], "fandl/debug");
        assert_eq!(names[node + 1], "fandl/jsdoc");
    }

    #[test]
    fn test_custom_config_and_rule_sets_are_exclusive() {
        let options = ComposeOptions {
            eslint_config: Some(Vec::new()),
            rule_sets: Some(RuleSets::default()),
            ..ComposeOptions::default()
        };
        let err = compose(&options).unwrap_err();
        assert!(matches!(err, FandlError::ArgumentInvalid { .. }));
    }

    #[test]
    fn test_custom_config_is_returned_as_given() {
        let custom = vec![ConfigEntry {
            rules: Map::from_iter([("semi".to_string(), json!("error"))]),
            ..ConfigEntry::default()
        }];
        let options = ComposeOptions {
            eslint_config: Some(custom.clone()),
            ..ComposeOptions::default()
        };
        assert_eq!(compose(&options).expect("Failed to compose"), custom);
    }

    #[test]
    fn test_disable_and_additional() {
        let rule_sets: RuleSets = serde_json::from_value(json!({
            "disable": ["debug", "standardjs", "jsdoc"],
            "additional": { "name": "mine", "rules": { "no-var": "off" } }
        }))
        .expect("valid rule sets");
        let options = ComposeOptions {
            rule_sets: Some(rule_sets),
            ..ComposeOptions::default()
        };
        let entries = compose(&options).expect("Failed to compose");
        let names = names(&entries);
        assert!(!names.iter().any(|n| n == "fandl/debug" || n == "fandl/standard-js" || n == "fandl/jsdoc"));
        assert_eq!(names.last().map(String::as_str), Some("mine"));
    }

    #[test]
    fn test_override_replaces_layer_in_place() {
        let rule_sets: RuleSets = serde_json::from_value(json!({
            "complexity": { "name": "my-complexity", "rules": { "complexity": ["error", 10] } }
        }))
        .expect("valid rule sets");
        let options = ComposeOptions {
            rule_sets: Some(rule_sets),
            ..ComposeOptions::default()
        };
        let entries = compose(&options).expect("Failed to compose");
        assert_eq!(entries[5].name.as_deref(), Some("my-complexity"));
        assert_eq!(entries[5].rules["complexity"], json!(["error", 10]));
    }

    #[test]
    fn test_override_wins_over_disable() {
        let rule_sets: RuleSets = serde_json::from_value(json!({
            "disable": ["smells"],
            "smells": { "name": "kept" }
        }))
        .expect("valid rule sets");
        let options = ComposeOptions {
            rule_sets: Some(rule_sets),
            ..ComposeOptions::default()
        };
        let entries = compose(&options).expect("Failed to compose");
        assert!(names(&entries).iter().any(|n| n == "kept"));
    }

    #[test]
    fn test_unknown_layer_name_is_rejected() {
        let parsed = serde_json::from_value::<RuleSets>(json!({ "bogus": {} }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_base_cannot_be_disabled() {
        let options = ComposeOptions {
            rule_sets: Some(RuleSets {
                disable: vec![LayerName::Base],
                ..RuleSets::default()
            }),
            ..ComposeOptions::default()
        };
        let err = compose(&options).unwrap_err();
        assert!(err.to_string().contains("'base' cannot be disabled"));
    }

    #[test]
    fn test_config_entry_round_trips_unknown_keys() {
        let value = json!({
            "files": ["**/*.js"],
            "linterOptions": { "reportUnusedDisableDirectives": "error" },
            "plugins": { "react": "eslint-plugin-react" }
        });
        let entry: ConfigEntry = serde_json::from_value(value.clone()).expect("valid entry");
        assert_eq!(entry.plugins["react"].package, "eslint-plugin-react");
        assert_eq!(serde_json::to_value(&entry).expect("serializes"), value);
    }
}
