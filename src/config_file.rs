//! Loading of user-supplied configuration paths.
//!
//! `--eslint-config-path`, `--rule-sets-path` and `--prettier-config-path`
//! accept structured data (`.json`, `.yml`, `.yaml`, `.toml`) or a JavaScript
//! module whose default export is the configuration. Modules are evaluated
//! by `node`, which prints the export as JSON. An eslint config module is
//! not loaded here; the linter imports it directly.

use crate::engine::process::{exit_error, run_with_input};
use crate::error::{FandlError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

const NODE: &str = "node";

const EVALUATE_DEFAULT_EXPORT: &str = "import { pathToFileURL } from 'node:url'
const module = await import(pathToFileURL(process.argv[1]).href)
process.stdout.write(JSON.stringify(module.default ?? null))
";

/// How a configuration path is read, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yml` or `.yaml`
    Yaml,
    /// `.toml`
    Toml,
    /// Anything else, evaluated as a JavaScript module.
    Module,
}

impl ConfigFormat {
    /// Picks the format from the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("yml" | "yaml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Module,
        }
    }
}

fn evaluate_module(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)?;
    let mut command = Command::new(NODE);
    command
        .arg("--input-type=module")
        .arg("-e")
        .arg(EVALUATE_DEFAULT_EXPORT)
        .arg(&absolute);
    let output = run_with_input(NODE, &mut command, "")?;
    if !output.status.success() {
        return Err(exit_error(NODE, &output));
    }
    String::from_utf8(output.stdout)
        .map_err(|e| FandlError::engine_error(NODE, format!("Output is not UTF-8: {}", e)))
}

/// Parses the JSON printed for a module's default export.
fn parse_module_export<T: DeserializeOwned>(json: &str, path: &Path) -> Result<T> {
    if json.trim() == "null" {
        return Err(FandlError::config_error_with_path(
            "Module has no default export",
            path.to_path_buf(),
        ));
    }
    serde_json::from_str(json).map_err(FandlError::from)
}

/// Loads the configuration at `path` as a `T`.
///
/// # Errors
///
/// Returns an `IoError` when the file cannot be read, a `ConfigError` naming
/// the path when it does not parse into a `T`, and an `EngineError` when a
/// module cannot be evaluated.
pub fn load_config_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = ConfigFormat::from_path(path);
    debug!("Loading {:?} configuration from {}", format, path.display());

    let read = || {
        fs::read_to_string(path)
            .map_err(|e| FandlError::io_error_with_source("read config file", path.to_path_buf(), e))
    };
    let parsed = match format {
        ConfigFormat::Json => serde_json::from_str(&read()?).map_err(FandlError::from),
        ConfigFormat::Yaml => serde_yaml::from_str(&read()?).map_err(FandlError::from),
        ConfigFormat::Toml => toml::from_str(&read()?).map_err(FandlError::from),
        ConfigFormat::Module => parse_module_export(&evaluate_module(path)?, path),
    };
    parsed.map_err(|e| e.with_path(path))
}
