//! Settings read from the project manifest (`package.json`).
//!
//! Two consumers read the manifest: file selection takes the
//! `devPkg.linting.ignores` list, and the configuration composer takes the
//! source type, the `engines.node` declaration and React usage.

use crate::error::{FandlError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Conventional name of the project manifest.
pub const PACKAGE_FILE: &str = "package.json";

/// The parts of `package.json` fandl cares about.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(rename = "type")]
    module_type: Option<String>,
    #[serde(default)]
    dependencies: Map<String, Value>,
    #[serde(default)]
    dev_dependencies: Map<String, Value>,
    #[serde(default)]
    engines: Map<String, Value>,
    #[serde(default)]
    pkgdev: Map<String, Value>,
    dev_pkg: Option<DevPkg>,
}

#[derive(Debug, Default, Deserialize)]
struct DevPkg {
    linting: Option<Linting>,
}

#[derive(Debug, Default, Deserialize)]
struct Linting {
    #[serde(default)]
    ignores: Vec<String>,
}

/// Reads and parses the manifest, returning `None` when it does not exist.
fn read_manifest(path: &Path) -> Result<Option<Manifest>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No manifest at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(FandlError::io_error_with_source(
                "read manifest",
                path.to_path_buf(),
                e,
            ));
        }
    };
    let manifest = serde_json::from_str(&contents).map_err(|e| FandlError::from(e).with_path(path))?;
    Ok(Some(manifest))
}

/// Returns the `devPkg.linting.ignores` patterns of the manifest at `path`.
///
/// A missing manifest or an absent key path yields an empty list.
///
/// # Errors
///
/// Returns a `ConfigError` when the manifest cannot be parsed.
pub fn process_package_ignores(path: &Path) -> Result<Vec<String>> {
    let ignores = read_manifest(path)?
        .and_then(|m| m.dev_pkg)
        .and_then(|d| d.linting)
        .map(|l| l.ignores)
        .unwrap_or_default();
    Ok(ignores)
}

/// Project facts that shape the default lint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    /// ECMAScript source type handed to the parser (`module` or `commonjs`).
    pub source_type: String,
    /// Whether the manifest declares `engines.node`.
    pub declares_node_engine: bool,
    /// Whether `react` is a dependency or dev dependency.
    pub uses_react: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            source_type: "module".to_string(),
            declares_node_engine: false,
            uses_react: false,
        }
    }
}

impl ProjectSettings {
    /// Loads the settings from the manifest at `path`.
    ///
    /// A missing manifest yields [`ProjectSettings::default`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the manifest cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_manifest(path)?.map(Self::from).unwrap_or_default())
    }
}

impl From<Manifest> for ProjectSettings {
    fn from(manifest: Manifest) -> Self {
        let configured = manifest
            .pkgdev
            .get("format-and-lint")
            .and_then(|v| v.get("sourceType"))
            .and_then(Value::as_str)
            .map(String::from);
        let source_type = configured
            .or(manifest.module_type)
            .unwrap_or_else(|| "module".to_string());

        Self {
            source_type,
            declares_node_engine: manifest.engines.contains_key("node"),
            uses_react: manifest.dependencies.contains_key("react")
                || manifest.dev_dependencies.contains_key("react"),
        }
    }
}
