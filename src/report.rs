//! Rendering of lint results and the exit policy.
//!
//! A report is the rendering of every result that carries at least one
//! message. An empty rendering means success; anything else fails the run.

use crate::engine::{LintResult, Severity};
use crate::error::{FandlError, Result};
use prettytable::{Cell, Row, Table, format};

/// Renders lint results for people or tools.
pub trait ReportFormatter: Send + Sync {
    /// Renders `results`; returns an empty string when there is nothing to report.
    fn format(&self, results: &[LintResult]) -> String;
}

/// Human-readable output grouped by file, in the style of eslint's `stylish`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StylishFormatter;

/// The results as a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

fn plural(count: usize, word: &str) -> String {
    format!("{} {}{}", count, word, if count == 1 { "" } else { "s" })
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

impl ReportFormatter for StylishFormatter {
    fn format(&self, results: &[LintResult]) -> String {
        let mut output = String::new();
        let mut errors = 0;
        let mut warnings = 0;

        for result in results.iter().filter(|r| !r.messages.is_empty()) {
            errors += result.error_count();
            warnings += result.warning_count();

            let mut table = Table::new();
            table.set_format(format::FormatBuilder::new().padding(2, 0).build());
            for message in &result.messages {
                table.add_row(Row::new(vec![
                    Cell::new(&format!("{}:{}", message.line, message.column)),
                    Cell::new(severity_label(message.severity)),
                    Cell::new(&message.message),
                    Cell::new(message.rule_id.as_deref().unwrap_or("")),
                ]));
            }

            output.push('\n');
            output.push_str(&result.file_path.display().to_string());
            output.push('\n');
            output.push_str(&table.to_string());
        }

        if output.is_empty() {
            return output;
        }
        output.push_str(&format!(
            "\n\u{2716} {} ({}, {})\n",
            plural(errors + warnings, "problem"),
            plural(errors, "error"),
            plural(warnings, "warning")
        ));
        output
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, results: &[LintResult]) -> String {
        let reported: Vec<&LintResult> = results.iter().filter(|r| !r.messages.is_empty()).collect();
        if reported.is_empty() {
            return String::new();
        }
        // serializing plain data into a String cannot fail
        serde_json::to_string(&reported).unwrap_or_default()
    }
}

/// Looks up a formatter by name.
///
/// # Errors
///
/// Returns `ArgumentInvalid` for names other than `stylish` and `json`.
pub fn load_formatter(name: &str) -> Result<Box<dyn ReportFormatter>> {
    match name {
        "stylish" => Ok(Box::new(StylishFormatter)),
        "json" => Ok(Box::new(JsonFormatter)),
        other => Err(FandlError::argument_invalid_with_hint(
            format!("Unknown report formatter '{}'.", other),
            "Use 'stylish' or 'json'.",
        )),
    }
}

/// Process exit status for a rendered report: 0 when empty, 1 otherwise.
pub fn exit_code(rendered: &str) -> i32 {
    if rendered.is_empty() { 0 } else { 1 }
}
