//! Fixed table of conflicts between layers.
//!
//! When the winning layer is part of the composition, the listed rules are
//! removed from the losing layer's default entry and the replacements are set
//! on it. Replacement entries supplied by the user are never edited.

use super::{ConfigEntry, LayerName};
use serde_json::{Value, json};
use tracing::debug;

/// A layer's entry as it goes through composition.
#[derive(Debug, Clone)]
pub struct ComposedLayer {
    /// The layer the entry belongs to.
    pub layer: LayerName,
    /// The entry itself.
    pub entry: ConfigEntry,
    /// `false` when the entry came from the user.
    pub is_default: bool,
}

/// One row of the suppression table.
#[derive(Debug, Clone)]
pub struct Suppression {
    /// The layer whose presence triggers the row.
    pub winner: LayerName,
    /// The layer edited.
    pub loser: LayerName,
    /// Rules deleted from the loser.
    pub omit: &'static [&'static str],
    /// Rules set on the loser.
    pub replace: Vec<(&'static str, Value)>,
}

/// The suppression table, in application order.
#[must_use]
pub fn suppression_table() -> Vec<Suppression> {
    vec![
        // stylistic already covers these
        Suppression {
            winner: LayerName::Stylistic,
            loser: LayerName::StandardJs,
            omit: &["block-spacing", "eol-last", "no-trailing-spaces"],
            replace: Vec::new(),
        },
        Suppression {
            winner: LayerName::Style,
            loser: LayerName::StandardJs,
            omit: &[
                "brace-style",
                "comma-dangle",
                "key-spacing",
                "operator-linebreak",
                "space-before-function-paren",
            ],
            // React must be imported for JSX even when not referenced
            replace: vec![(
                "no-unused-vars",
                json!(["error", { "varsIgnorePattern": "React" }]),
            )],
        },
    ]
}

/// Applies [`suppression_table`] to `layers`.
pub fn apply(layers: &mut [ComposedLayer]) {
    for row in suppression_table() {
        if !layers.iter().any(|l| l.layer == row.winner) {
            continue;
        }
        let Some(loser) = layers
            .iter_mut()
            .find(|l| l.layer == row.loser && l.is_default)
        else {
            continue;
        };
        debug!("Suppressing {} rules of '{}' in favor of '{}'", row.omit.len(), row.loser, row.winner);
        for rule in row.omit {
            loser.entry.omit_rule(rule);
        }
        for (rule, value) in row.replace {
            loser.entry.rules.insert(rule.to_string(), value);
        }
    }
}
