//! Default entries of the named layers.
//!
//! Each function is pure: its output depends only on the [`ProjectSettings`]
//! it is given.

use super::{ConfigEntry, LanguageOptions, LayerName, ModuleRef};
use crate::extensions::{ALL_EXTS, JSX_EXTS, ext_group};
use crate::package_settings::ProjectSettings;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Statement kinds known to `padding-line-between-statements`.
pub const LINEBREAK_TYPES: &[&str] = &[
    "block",
    "block-like",
    "break",
    "case",
    "cjs-export",
    "cjs-import",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "directive",
    "do",
    "empty",
    "export",
    "expression",
    "for",
    "function",
    "if",
    "iife",
    "import",
    "let",
    "multiline-block-like",
    "multiline-const",
    "multiline-expression",
    "multiline-let",
    "multiline-var",
    "return",
    "singleline-const",
    "singleline-let",
    "singleline-var",
    "switch",
    "throw",
    "try",
    "var",
    "while",
    "with",
];

/// Returns every statement kind except `excluded`, in the canonical order.
#[must_use]
pub fn linebreak_types_except(excluded: &[&str]) -> Vec<&'static str> {
    LINEBREAK_TYPES
        .iter()
        .copied()
        .filter(|t| !excluded.contains(t))
        .collect()
}

fn module(package: &str, member: &[&str]) -> ModuleRef {
    ModuleRef {
        package: package.to_string(),
        member: member.iter().map(|m| m.to_string()).collect(),
    }
}

fn rules(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn all_files() -> Vec<String> {
    vec![format!("**/*{}", ext_group(ALL_EXTS))]
}

fn react_settings(project: &ProjectSettings) -> Map<String, Value> {
    let react = if project.uses_react {
        json!({ "version": "detect" })
    } else {
        json!({})
    };
    Map::from_iter([("react".to_string(), react)])
}

/// An entry carrying the shared defaults: every recognized file, the
/// project's source type, latest syntax with JSX, and React settings.
fn base_entry(layer: LayerName, project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        name: Some(format!("fandl/{}", layer)),
        files: Some(all_files()),
        language_options: Some(LanguageOptions {
            source_type: Some(project.source_type.clone()),
            ecma_version: Some(json!("latest")),
            parser_options: Some(json!({
                "sourceType": project.source_type,
                "ecmaFeatures": { "jsx": true },
            })),
            ..LanguageOptions::default()
        }),
        settings: react_settings(project),
        ..ConfigEntry::default()
    }
}

fn stylistic_plugin() -> BTreeMap<String, ModuleRef> {
    BTreeMap::from([("@stylistic".to_string(), module("@stylistic/eslint-plugin", &[]))])
}

fn base_recommended(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        rule_presets: vec![module("@eslint/js", &["configs", "recommended", "rules"])],
        ..base_entry(LayerName::BaseRecommended, project)
    }
}

fn stylistic(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        plugins: stylistic_plugin(),
        rule_presets: vec![module("@stylistic/eslint-plugin", &["configs", "recommended", "rules"])],
        // binary operator indentation is left to the formatter
        omit_rules: vec!["@stylistic/indent-binary-ops".to_string()],
        ..base_entry(LayerName::Stylistic, project)
    }
}

fn standard_js(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        rule_presets: vec![module("eslint-config-standard", &["rules"])],
        omit_rules: vec![
            "indent".to_string(),
            "indent-binary-ops".to_string(),
            "quote-props".to_string(),
        ],
        rules: rules(json!({
            "no-var": "error",
            "object-shorthand": ["warn", "properties"],
        })),
        ..base_entry(LayerName::StandardJs, project)
    }
}

fn style(project: &ProjectSettings) -> ConfigEntry {
    let not_export = linebreak_types_except(&["cjs-export", "export"]);
    let mut style_rules = rules(json!({
        "@stylistic/brace-style": ["error", "stroustrup", { "allowSingleLine": true }],
        "@stylistic/key-spacing": [
            "error",
            { "align": "colon", "afterColon": true, "beforeColon": true }
        ],
        "@stylistic/quotes": [
            "error",
            "single",
            { "allowTemplateLiterals": true, "avoidEscape": true }
        ],
        "@stylistic/arrow-parens": ["error", "always"],
        "@stylistic/array-bracket-newline": ["error", "consistent"],
        "@stylistic/array-element-newline": ["error", "consistent"],
        "@stylistic/comma-dangle": ["error", "always-multiline"],
        "@stylistic/function-call-argument-newline": ["error", "consistent"],
        "@stylistic/function-call-spacing": ["error", "never"],
        "@stylistic/function-paren-newline": ["error", "consistent"],
    }));
    style_rules.extend(rules(json!({
        "@stylistic/indent": [
            "error",
            2,
            {
                "ArrayExpression": 1,
                "CallExpression": { "arguments": 1 },
                "flatTernaryExpressions": false,
                "FunctionDeclaration": { "body": 1, "parameters": 1 },
                "FunctionExpression": { "body": 1, "parameters": 1 },
                "ignoreComments": false,
                "ignoredNodes": [
                    "TSUnionType",
                    "TSIntersectionType",
                    "TSTypeParameterInstantiation",
                    "FunctionExpression > .params[decorators.length > 0]",
                    "FunctionExpression > .params > :matches(Decorator, :not(:first-child))"
                ],
                "ImportDeclaration": 1,
                "MemberExpression": 1,
                "ObjectExpression": 1,
                "offsetTernaryExpressions": true,
                "outerIIFEBody": 1,
                "SwitchCase": 1,
                "VariableDeclarator": 4
            }
        ],
    })));
    style_rules.extend(rules(json!({
        "@stylistic/linebreak-style": ["error", "unix"],
        "@stylistic/max-statements-per-line": ["error", { "max": 2 }],
        "@stylistic/operator-linebreak": [
            "error",
            "before",
            { "overrides": { "=": "after", "-=": "after", "+=": "after" } }
        ],
        "@stylistic/padding-line-between-statements": [
            "error",
            { "blankLine": "always", "prev": "*", "next": "class" },
            { "blankLine": "always", "prev": not_export, "next": "export" },
            { "blankLine": "always", "prev": not_export, "next": "cjs-export" },
            {
                "blankLine": "always",
                "prev": "import",
                "next": linebreak_types_except(&["import"])
            },
            {
                "blankLine": "always",
                "prev": "cjs-import",
                "next": linebreak_types_except(&[
                    "cjs-import",
                    "const",
                    "let",
                    "singleline-const",
                    "singleline-let",
                    "singleline-var",
                    "var",
                ])
            },
            { "blankLine": "always", "prev": "*", "next": "return" }
        ],
        "@stylistic/semi-style": ["error", "first"],
        "@stylistic/space-before-function-paren": [
            "error",
            { "anonymous": "always", "asyncArrow": "always", "named": "never" }
        ],
        "@stylistic/switch-colon-spacing": ["error", { "after": true, "before": false }],
        "yoda": ["error", "never"],
    })));
    ConfigEntry {
        plugins: stylistic_plugin(),
        rules: style_rules,
        ..base_entry(LayerName::Style, project)
    }
}

fn smells(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        rules: rules(json!({
            "no-lonely-if": "error",
            "no-return-assign": "error",
            "no-shadow": "error",
            "no-extra-label": "error",
            "no-label-var": "error",
            "no-invalid-this": "error",
            "no-unreachable-loop": "error",
            "no-extra-bind": "error",
            "consistent-return": "error",
            "default-case-last": "error",
            "eqeqeq": "error",
        })),
        ..base_entry(LayerName::Smells, project)
    }
}

fn complexity(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        rules: rules(json!({
            "complexity": ["error", 20],
            "max-depth": ["error", 4],
            "max-lines": ["error", { "max": 300, "skipBlankLines": true, "skipComments": true }],
            "max-lines-per-function": [
                "error",
                { "max": 50, "skipBlankLines": true, "skipComments": true }
            ],
        })),
        ..base_entry(LayerName::Complexity, project)
    }
}

fn efficiency(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        rules: rules(json!({
            "no-await-in-loop": "error",
            "require-await": "error",
        })),
        ..base_entry(LayerName::Efficiency, project)
    }
}

fn debug(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        rules: rules(json!({
            "no-debugger": "error",
            "no-console": "error",
            "no-alert": "error",
        })),
        ..base_entry(LayerName::Debug, project)
    }
}

fn node(project: &ProjectSettings) -> Option<ConfigEntry> {
    if !project.declares_node_engine {
        return None;
    }
    let mut entry = ConfigEntry {
        plugins: BTreeMap::from([("n".to_string(), module("eslint-plugin-n", &[]))]),
        rule_presets: vec![module("eslint-plugin-n", &["configs", "flat/recommended", "rules"])],
        rules: rules(json!({
            "n/no-unsupported-features/es-syntax": "off",
            "n/prefer-promises/dns": "error",
            "n/prefer-promises/fs": "error",
            "n/no-missing-import": ["error", { "tryExtensions": ALL_EXTS }],
        })),
        ..base_entry(LayerName::Node, project)
    };
    if let Some(options) = entry.language_options.as_mut() {
        options.global_presets.push(module("globals", &["node"]));
    }
    Some(entry)
}

fn jsdoc(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        ignores: Some(vec![
            format!("**/index{}", ext_group(ALL_EXTS)),
            "**/__tests__/**/*".to_string(),
            "**/*.test.*".to_string(),
        ]),
        plugins: BTreeMap::from([("jsdoc".to_string(), module("eslint-plugin-jsdoc", &[]))]),
        rule_presets: vec![module("eslint-plugin-jsdoc", &["configs", "flat/recommended-error", "rules"])],
        rules: rules(json!({
            "jsdoc/require-description": "error",
            "jsdoc/no-defaults": "off",
            "jsdoc/check-tag-names": ["error", { "definedTags": ["category"] }],
        })),
        ..base_entry(LayerName::Jsdoc, project)
    }
}

fn base(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        plugins: BTreeMap::from([
            ("import".to_string(), module("eslint-plugin-import", &[])),
            ("promise".to_string(), module("eslint-plugin-promise", &[])),
            ("n".to_string(), module("eslint-plugin-n", &[])),
        ]),
        rules: rules(json!({ "import/export": "off" })),
        ..base_entry(LayerName::Base, project)
    }
}

fn jsx(project: &ProjectSettings) -> ConfigEntry {
    ConfigEntry {
        name: Some(format!("fandl/{}", LayerName::Jsx)),
        files: Some(vec![format!("**/*{}", ext_group(JSX_EXTS))]),
        language_options: Some(LanguageOptions {
            global_presets: vec![module("globals", &["browser"])],
            ..LanguageOptions::default()
        }),
        settings: react_settings(project),
        ..ConfigEntry::default()
    }
}

fn test() -> ConfigEntry {
    ConfigEntry {
        name: Some(format!("fandl/{}", LayerName::Test)),
        files: Some(vec![
            "**/__tests__/**".to_string(),
            format!("**/*.test{}", ext_group(ALL_EXTS)),
        ]),
        language_options: Some(LanguageOptions {
            global_presets: vec![module("globals", &["jest"])],
            ..LanguageOptions::default()
        }),
        // test suites are long by nature
        rules: rules(json!({ "max-lines-per-function": "off" })),
        ..ConfigEntry::default()
    }
}

/// Returns the default entry of `layer`, or `None` when the layer does not
/// apply to the project.
#[must_use]
pub fn default_entry(layer: LayerName, project: &ProjectSettings) -> Option<ConfigEntry> {
    match layer {
        LayerName::BaseRecommended => Some(base_recommended(project)),
        LayerName::Stylistic => Some(stylistic(project)),
        LayerName::StandardJs => Some(standard_js(project)),
        LayerName::Style => Some(style(project)),
        LayerName::Smells => Some(smells(project)),
        LayerName::Complexity => Some(complexity(project)),
        LayerName::Efficiency => Some(efficiency(project)),
        LayerName::Debug => Some(debug(project)),
        LayerName::Node => node(project),
        LayerName::Jsdoc => Some(jsdoc(project)),
        LayerName::Base => Some(base(project)),
        LayerName::Jsx => Some(jsx(project)),
        LayerName::Test => Some(test()),
    }
}
