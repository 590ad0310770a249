//! Project configuration file support for fandl.
//!
//! This module loads `fandl.toml` and merges it with command-line arguments
//! into one fully-defaulted [`Settings`] record. CLI arguments take
//! precedence over config file values, which take precedence over built-in
//! defaults. The merge happens once, in [`Settings::resolve`]; validation
//! runs against its result.

use crate::cli::RunArgs;
use crate::engine::resolve_bin;
use crate::error::{FandlError, Result};
use crate::processor::normalize_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file names to search for.
const DEFAULT_CONFIG_FILES: &[&str] = &["fandl.toml", ".fandl.toml"];

/// The report formatter used when none is configured.
pub const DEFAULT_FORMATTER: &str = "stylish";

/// Main configuration structure representing a `fandl.toml` file.
///
/// Configuration files use a merge strategy where:
/// 1. CLI arguments (highest priority)
/// 2. Config file values
/// 3. Default values (lowest priority)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FandlConfig {
    /// File selection.
    #[serde(default)]
    pub files: FilesConfig,

    /// Lint configuration and reporting.
    #[serde(default)]
    pub lint: LintConfig,

    /// Format configuration.
    #[serde(default)]
    pub format: FormatConfig,

    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[files]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Include glob patterns.
    #[serde(default)]
    pub include: Vec<String>,
    /// Files of include patterns.
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Exclude glob patterns.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Files of exclude patterns.
    #[serde(default)]
    pub ignore_paths: Vec<PathBuf>,
    /// Search root.
    pub root: Option<PathBuf>,
    /// Skip the built-in and `.gitignore` exclusions.
    #[serde(default)]
    pub no_standard_ignores: bool,
    /// Skip the `package.json` exclusions.
    #[serde(default)]
    pub ignore_package_settings: bool,
}

/// `[lint]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Complete eslint configuration.
    pub eslint_config_path: Option<PathBuf>,
    /// Adjustments to the default rule sets.
    pub rule_sets_path: Option<PathBuf>,
    /// The eslint executable.
    pub eslint_bin: Option<PathBuf>,
    /// Report formatter name (`stylish` or `json`).
    pub formatter: Option<String>,
}

/// `[format]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Complete prettier options.
    pub prettier_config_path: Option<PathBuf>,
    /// The prettier executable.
    pub prettier_bin: Option<PathBuf>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Write results under this directory instead of in place.
    pub dir: Option<PathBuf>,
    /// Prefix stripped from source paths under `dir`.
    pub relative_stem: Option<PathBuf>,
}

fn rebase(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

fn rebase_opt(base: &Path, path: &mut Option<PathBuf>) {
    if let Some(path) = path {
        rebase(base, path);
    }
}

impl FandlConfig {
    /// Makes every relative path in the file absolute against `base`, the
    /// directory holding the file.
    ///
    /// Executable paths without a directory component (`eslint`) are left
    /// alone so they keep resolving through the PATH.
    #[must_use]
    pub fn rebased(mut self, base: &Path) -> Self {
        self.files.include_paths.iter_mut().for_each(|p| rebase(base, p));
        self.files.ignore_paths.iter_mut().for_each(|p| rebase(base, p));
        rebase_opt(base, &mut self.files.root);
        rebase_opt(base, &mut self.lint.eslint_config_path);
        rebase_opt(base, &mut self.lint.rule_sets_path);
        rebase_opt(base, &mut self.format.prettier_config_path);
        rebase_opt(base, &mut self.output.dir);
        rebase_opt(base, &mut self.output.relative_stem);
        for bin in [&mut self.lint.eslint_bin, &mut self.format.prettier_bin].into_iter().flatten() {
            if bin.components().count() > 1 {
                rebase(base, bin);
            }
        }
        self
    }
}

/// Load configuration from a specific file path.
///
/// # Returns
///
/// Returns `Ok(None)` if the file doesn't exist, the parsed configuration
/// with paths made absolute otherwise.
///
/// # Errors
///
/// Returns a `ConfigError` naming the file if it exists but cannot be parsed.
pub fn load_config_from_path(path: &Path) -> Result<Option<FandlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| FandlError::io_error_with_source("read config file", path.to_path_buf(), e))?;
    let config: FandlConfig = toml::from_str(&content).map_err(|e| FandlError::from(e).with_path(path))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(Some(config.rebased(base)))
}

/// Discover and load configuration, searching `start` and its parent directories.
///
/// # Returns
///
/// Returns `Some((path, config))` for the first file found, `None` when none exists.
pub fn discover_config(start: &Path) -> Result<Option<(PathBuf, FandlConfig)>> {
    let mut current_dir = start.to_path_buf();

    loop {
        for config_name in DEFAULT_CONFIG_FILES {
            let config_path = current_dir.join(config_name);
            if let Some(config) = load_config_from_path(&config_path)? {
                debug!("Using config file {}", config_path.display());
                return Ok(Some((config_path, config)));
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Ok(None)
}

/// Load configuration from `config_path`, or discover it upward from `cwd`.
///
/// # Errors
///
/// Unlike discovery, an explicitly named file that does not exist is an error.
pub fn load_config(config_path: Option<&Path>, cwd: &Path) -> Result<Option<(PathBuf, FandlConfig)>> {
    match config_path {
        Some(path) => {
            let path = cwd.join(path);
            match load_config_from_path(&path)? {
                Some(config) => Ok(Some((path, config))),
                None => Err(FandlError::argument_invalid(format!(
                    "Config file '{}' does not exist.",
                    path.display()
                ))),
            }
        }
        None => discover_config(cwd),
    }
}

/// The fully-defaulted options of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Search root.
    pub root: PathBuf,
    /// Include glob patterns.
    pub files: Vec<String>,
    /// Files of include patterns.
    pub files_paths: Vec<PathBuf>,
    /// Exclude glob patterns.
    pub ignore_files: Vec<String>,
    /// Files of exclude patterns.
    pub ignore_files_paths: Vec<PathBuf>,
    /// Skip the built-in and `.gitignore` exclusions.
    pub no_standard_ignores: bool,
    /// Skip the `package.json` exclusions.
    pub ignore_package_settings: bool,
    /// Complete eslint configuration.
    pub eslint_config_path: Option<PathBuf>,
    /// Adjustments to the default rule sets.
    pub rule_sets_path: Option<PathBuf>,
    /// Complete prettier options.
    pub prettier_config_path: Option<PathBuf>,
    /// The eslint executable.
    pub eslint_bin: PathBuf,
    /// The prettier executable.
    pub prettier_bin: PathBuf,
    /// Report formatter name.
    pub formatter: String,
    /// Write results under this directory instead of in place.
    pub output_dir: Option<PathBuf>,
    /// Prefix stripped from source paths under `output_dir`.
    pub relative_stem: PathBuf,
}

fn pick_vec<T: Clone>(cli: &[T], file: &[T]) -> Vec<T> {
    if cli.is_empty() { file.to_vec() } else { cli.to_vec() }
}

impl Settings {
    /// Merges CLI arguments over the config file over built-in defaults.
    ///
    /// Relative CLI paths resolve against `cwd`; config file paths were
    /// already made absolute when the file was loaded.
    pub fn resolve(args: &RunArgs, config: &FandlConfig, cwd: &Path) -> Self {
        let from_cli = |p: &Option<PathBuf>| p.as_ref().map(|p| normalize_path(&cwd.join(p)));
        let cli_paths = |ps: &[PathBuf]| ps.iter().map(|p| cwd.join(p)).collect::<Vec<_>>();

        let root = from_cli(&args.root)
            .or_else(|| config.files.root.as_deref().map(normalize_path))
            .unwrap_or_else(|| normalize_path(cwd));
        let eslint_bin = config
            .lint
            .eslint_bin
            .clone()
            .unwrap_or_else(|| resolve_bin(&root, "eslint"));
        let prettier_bin = config
            .format
            .prettier_bin
            .clone()
            .unwrap_or_else(|| resolve_bin(&root, "prettier"));

        Self {
            files: pick_vec(&args.files, &config.files.include),
            files_paths: pick_vec(&cli_paths(&args.files_paths), &config.files.include_paths),
            ignore_files: pick_vec(&args.ignore_files, &config.files.ignore),
            ignore_files_paths: pick_vec(&cli_paths(&args.ignore_files_paths), &config.files.ignore_paths),
            no_standard_ignores: args.no_standard_ignores || config.files.no_standard_ignores,
            ignore_package_settings: args.ignore_package_settings || config.files.ignore_package_settings,
            eslint_config_path: from_cli(&args.eslint_config_path).or_else(|| config.lint.eslint_config_path.clone()),
            rule_sets_path: from_cli(&args.rule_sets_path).or_else(|| config.lint.rule_sets_path.clone()),
            prettier_config_path: from_cli(&args.prettier_config_path)
                .or_else(|| config.format.prettier_config_path.clone()),
            eslint_bin,
            prettier_bin,
            formatter: config
                .lint
                .formatter
                .clone()
                .unwrap_or_else(|| DEFAULT_FORMATTER.to_string()),
            output_dir: from_cli(&args.output_dir).or_else(|| config.output.dir.as_deref().map(normalize_path)),
            relative_stem: from_cli(&args.relative_stem)
                .or_else(|| config.output.relative_stem.as_deref().map(normalize_path))
                .unwrap_or_else(|| normalize_path(cwd)),
            root,
        }
    }

    /// Checks options that cannot be combined.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentInvalid` when both a complete eslint configuration and
    /// rule-set adjustments are given.
    pub fn validate(&self) -> Result<()> {
        if self.eslint_config_path.is_some() && self.rule_sets_path.is_some() {
            return Err(FandlError::argument_invalid(
                "Specifying both '--eslint-config-path' and '--rule-sets-path' is invalid. Please specify one or the other.",
            ));
        }
        Ok(())
    }
}
