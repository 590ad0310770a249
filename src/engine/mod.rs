//! The formatter and linter fandl drives.
//!
//! Both engines sit behind traits so the processor can be exercised without
//! a JavaScript toolchain. The shipped implementations run the project's
//! `prettier` and `eslint` executables as subprocesses.

pub mod eslint;
pub mod prettier;
pub mod process;

use crate::error::{FandlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use eslint::{EslintCli, render_config_module, render_reexport_module};
pub use prettier::{PrettierCli, default_prettier_config, effective_prettier_config};

/// Reformats source text.
///
/// One instance is shared read-only by every per-file task.
pub trait FormatEngine: Send + Sync {
    /// Returns the formatted text of `text`, which was read from `path`.
    ///
    /// # Errors
    ///
    /// Returns an `EngineError` when the formatter fails.
    fn format(&self, text: &str, path: &Path) -> Result<String>;
}

/// Lints source text, optionally fixing what it can.
///
/// One instance is shared read-only by every per-file task.
pub trait LintEngine: Send + Sync {
    /// Lints `text` as if it were the content of `path`.
    ///
    /// The path selects which configuration entries apply.
    ///
    /// # Errors
    ///
    /// Returns an `EngineError` when the linter fails.
    fn lint_text(&self, text: &str, path: &Path) -> Result<LintResult>;
}

/// How serious a lint message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    /// Reported but not failing on its own.
    Warning,
    /// A rule violation or fatal problem.
    Error,
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, String> {
        match value {
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Error),
            other => Err(format!("unknown severity {}", other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    /// The rule that reported it; absent for parse errors and read failures.
    #[serde(default)]
    pub rule_id: Option<String>,
    /// Warning or error.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// 1-based line, 0 when unknown.
    #[serde(default)]
    pub line: u32,
    /// 1-based column, 0 when unknown.
    #[serde(default)]
    pub column: u32,
    /// Set for problems that stopped the file from being linted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fatal: bool,
}

impl LintMessage {
    /// A fatal error message with no location or rule.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            rule_id: None,
            severity: Severity::Error,
            message: message.into(),
            line: 0,
            column: 0,
            fatal: true,
        }
    }
}

/// The outcome of linting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    /// The linted file.
    pub file_path: PathBuf,
    /// Diagnostics in report order.
    #[serde(default)]
    pub messages: Vec<LintMessage>,
    /// The final text, present only when it differs from what was on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl LintResult {
    /// A result with no messages and no output.
    pub fn clean(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            messages: Vec::new(),
            output: None,
        }
    }

    /// Number of error messages.
    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count()
    }

    /// Number of warning messages.
    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
            .count()
    }
}

/// Finds the executable `name` for a project rooted at `root`.
///
/// Prefers `<root>/node_modules/.bin/<name>` and falls back to `name` on the PATH.
#[must_use]
pub fn resolve_bin(root: &Path, name: &str) -> PathBuf {
    let local = root.join("node_modules").join(".bin").join(name);
    if local.is_file() {
        local
    } else {
        PathBuf::from(name)
    }
}

/// Parses engine JSON output, naming the engine on failure.
pub(crate) fn parse_engine_json<T: serde::de::DeserializeOwned>(engine: &str, stdout: &[u8]) -> Result<T> {
    serde_json::from_slice(stdout).map_err(|e| FandlError::EngineError {
        engine: engine.to_string(),
        message: format!("Could not parse output: {}", e),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lint_result_parses_eslint_json() {
        let json = r#"[{
            "filePath": "/p/src/a.js",
            "messages": [
                { "ruleId": "semi", "severity": 2, "message": "Missing semicolon.", "line": 1, "column": 10, "nodeType": "X" },
                { "ruleId": null, "severity": 2, "message": "Parsing error", "line": 3, "column": 1, "fatal": true }
            ],
            "errorCount": 2,
            "output": "fixed\n"
        }]"#;
        let results: Vec<LintResult> = parse_engine_json("eslint", json.as_bytes()).expect("valid json");
        let result = &results[0];
        assert_eq!(result.file_path, PathBuf::from("/p/src/a.js"));
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.messages[0].rule_id.as_deref(), Some("semi"));
        assert!(result.messages[1].fatal);
        assert_eq!(result.output.as_deref(), Some("fixed\n"));
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let json = r#"{ "severity": 3, "message": "x" }"#;
        assert!(serde_json::from_str::<LintMessage>(json).is_err());
    }

    #[test]
    fn test_unparsable_engine_output_is_engine_error() {
        let err = parse_engine_json::<Vec<LintResult>>("eslint", b"Oops").unwrap_err();
        assert!(matches!(err, FandlError::EngineError { ref engine, .. } if engine == "eslint"));
    }

    #[test]
    fn test_counts_split_by_severity() {
        let mut result = LintResult::clean("/a.js");
        result.messages.push(LintMessage::fatal("boom"));
        result.messages.push(LintMessage {
            severity: Severity::Warning,
            ..LintMessage::fatal("meh")
        });
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_resolve_bin_prefers_local_install() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert_eq!(resolve_bin(dir.path(), "eslint"), PathBuf::from("eslint"));

        let bin_dir = dir.path().join("node_modules").join(".bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        fs::write(bin_dir.join("eslint"), "").expect("Failed to write bin");
        assert_eq!(resolve_bin(dir.path(), "eslint"), bin_dir.join("eslint"));
    }
}
