//! Prettier as a [`FormatEngine`].

use super::process::{exit_error, run_with_input};
use super::FormatEngine;
use crate::error::{FandlError, Result};
use serde_json::{Map, Value, json};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::instrument;

const ENGINE: &str = "prettier";

/// The format options used when no custom configuration is given.
#[must_use]
pub fn default_prettier_config() -> Map<String, Value> {
    match json!({
        "semi": false,
        "singleQuote": true,
        "trailingComma": "all",
        "arrowParens": "always",
        "tabWidth": 2,
        "printWidth": 120,
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Returns the options handed to prettier: `custom` (or the defaults) with
/// the parser forced to `babel`.
#[must_use]
pub fn effective_prettier_config(custom: Option<Map<String, Value>>) -> Map<String, Value> {
    let mut config = custom.unwrap_or_else(default_prettier_config);
    config.insert("parser".to_string(), json!("babel"));
    config
}

/// Runs the `prettier` executable once per file.
#[derive(Debug)]
pub struct PrettierCli {
    bin: PathBuf,
    config_file: NamedTempFile,
}

impl PrettierCli {
    /// Writes `options` to a temporary config file used by every invocation.
    ///
    /// # Errors
    ///
    /// Returns an `IoError` when the config file cannot be written.
    pub fn new(bin: impl Into<PathBuf>, options: &Map<String, Value>) -> Result<Self> {
        let mut config_file = tempfile::Builder::new()
            .prefix("fandl-prettier.")
            .suffix(".json")
            .tempfile()
            .map_err(|e| FandlError::io_error_with_source("create prettier config", std::env::temp_dir(), e))?;
        let contents = serde_json::to_vec_pretty(options)?;
        config_file.write_all(&contents).map_err(|e| {
            FandlError::io_error_with_source("write prettier config", config_file.path().to_path_buf(), e)
        })?;
        Ok(Self {
            bin: bin.into(),
            config_file,
        })
    }

    /// Path of the generated config file.
    pub fn config_path(&self) -> &Path {
        self.config_file.path()
    }
}

impl FormatEngine for PrettierCli {
    #[instrument(skip(self, text))]
    fn format(&self, text: &str, path: &Path) -> Result<String> {
        let mut command = Command::new(&self.bin);
        command
            .arg("--stdin-filepath")
            .arg(path)
            .arg("--config")
            .arg(self.config_file.path())
            .arg("--no-editorconfig");
        let output = run_with_input(ENGINE, &mut command, text)?;
        if !output.status.success() {
            return Err(exit_error(ENGINE, &output));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| FandlError::engine_error(ENGINE, format!("Output is not UTF-8: {}", e)))
    }
}
