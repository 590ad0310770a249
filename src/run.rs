//! Runs one CLI invocation.
//!
//! Options are merged and validated first; configuration files are loaded
//! and composed before any file is selected, so configuration mistakes fail
//! the run before anything is written.

use crate::cli::{Commands, RunArgs};
use crate::config::{FandlConfig, Settings, load_config};
use crate::config_file::{ConfigFormat, load_config_file};
use crate::engine::{EslintCli, PrettierCli, effective_prettier_config};
use crate::error::{FandlError, Result};
use crate::file_search::GlobFileSearch;
use crate::file_selection::{SelectFilesOptions, select_files};
use crate::format_and_lint::format_and_lint;
use crate::package_settings::{PACKAGE_FILE, ProjectSettings};
use crate::processor::ProcessOptions;
use crate::report::{exit_code, load_formatter};
use crate::rule_sets::{ComposeOptions, ConfigEntry, LintConfig, RuleSets, compose};
use serde_json::{Map, Value};
use std::io::Write;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Merges the project config file and `args` into validated settings.
///
/// # Errors
///
/// Fails when the config file cannot be loaded or the options conflict.
pub fn resolve_settings(args: &RunArgs, cwd: &Path) -> Result<Settings> {
    let config = match load_config(args.config.as_deref(), cwd)? {
        Some((path, config)) => {
            debug!("Loaded {}", path.display());
            config
        }
        None => FandlConfig::default(),
    };
    let settings = Settings::resolve(args, &config, cwd);
    settings.validate()?;
    Ok(settings)
}

/// Builds the lint configuration for `settings`.
///
/// A JavaScript eslint config module is passed through untouched; data
/// files are loaded as entries.
///
/// # Errors
///
/// Fails when a configuration file or the manifest cannot be loaded, or the
/// rule sets are invalid.
pub fn compose_lint_config(settings: &Settings) -> Result<LintConfig> {
    settings.validate()?;
    if let Some(path) = &settings.eslint_config_path
        && ConfigFormat::from_path(path) == ConfigFormat::Module
    {
        fs::metadata(path)
            .map_err(|e| FandlError::io_error_with_source("read config file", path.clone(), e))?;
        debug!("Using eslint config module {}", path.display());
        return Ok(LintConfig::Module(path.clone()));
    }

    let eslint_config = settings
        .eslint_config_path
        .as_deref()
        .map(load_config_file::<Vec<ConfigEntry>>)
        .transpose()?;
    let rule_sets = settings
        .rule_sets_path
        .as_deref()
        .map(load_config_file::<RuleSets>)
        .transpose()?;
    let project = ProjectSettings::load(&settings.root.join(PACKAGE_FILE))?;

    compose(&ComposeOptions {
        eslint_config,
        rule_sets,
        project,
    })
    .map(LintConfig::Entries)
}

/// Returns the prettier options for `settings`.
///
/// # Errors
///
/// Fails when the prettier config file cannot be loaded.
pub fn prettier_options(settings: &Settings) -> Result<Map<String, Value>> {
    let custom = settings
        .prettier_config_path
        .as_deref()
        .map(load_config_file::<Map<String, Value>>)
        .transpose()?;
    Ok(effective_prettier_config(custom))
}

#[instrument(skip_all, fields(check = check))]
fn format_and_lint_command(
    args: &RunArgs,
    check: bool,
    cwd: &Path,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<i32> {
    let settings = resolve_settings(args, cwd)?;
    let report_formatter = load_formatter(&settings.formatter)?;
    let lint_config = compose_lint_config(&settings)?;
    let prettier = prettier_options(&settings)?;

    let selection = SelectFilesOptions {
        files: settings.files.clone(),
        files_paths: settings.files_paths.clone(),
        ignore_files: settings.ignore_files.clone(),
        ignore_files_paths: settings.ignore_files_paths.clone(),
        no_standard_ignores: settings.no_standard_ignores,
        ignore_package_settings: settings.ignore_package_settings,
        ..SelectFilesOptions::new(&settings.root)
    };
    let files = select_files(&selection, &GlobFileSearch, stderr)?;
    info!("Selected {} files under {}", files.len(), settings.root.display());

    let formatter = PrettierCli::new(&settings.prettier_bin, &prettier)?;
    let linter = EslintCli::new(&settings.eslint_bin, &settings.root, &lint_config, !check)?;
    let options = ProcessOptions {
        check,
        output_dir: settings.output_dir.clone(),
        ..ProcessOptions::new(&settings.relative_stem)
    };
    let results = format_and_lint(&files, &formatter, &linter, &options)?;

    let rendered = report_formatter.format(&results);
    write!(stdout, "{}", rendered)?;
    Ok(exit_code(&rendered))
}

fn print_json(stdout: &mut dyn Write, value: &impl serde::Serialize) -> Result<i32> {
    writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(0)
}

/// Runs `command` and returns the process exit status.
///
/// The report and printed configurations go to `stdout`; warnings about
/// dropped `.gitignore` patterns go to `stderr`.
///
/// # Errors
///
/// Returns every fatal error; the caller prints it and exits non-zero.
pub fn run(command: Commands, cwd: &Path, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
    match command {
        Commands::FormatAndLint(args) => format_and_lint_command(&args, false, cwd, stdout, stderr),
        Commands::Lint(args) => format_and_lint_command(&args, true, cwd, stdout, stderr),
        Commands::ShowEslintConfig(args) => {
            let settings = resolve_settings(&args, cwd)?;
            match compose_lint_config(&settings)? {
                LintConfig::Entries(entries) => print_json(stdout, &entries),
                LintConfig::Module(path) => print_json(stdout, &load_config_file::<Value>(&path)?),
            }
        }
        Commands::ShowPrettierConfig(args) => {
            let settings = resolve_settings(&args, cwd)?;
            print_json(stdout, &prettier_options(&settings)?)
        }
        Commands::Version => {
            writeln!(stdout, "fandl {}", env!("CARGO_PKG_VERSION"))?;
            Ok(0)
        }
    }
}
