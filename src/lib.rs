//! # fandl - format and lint
//!
//! fandl drives prettier and eslint over a JavaScript project in one pass.
//! It decides which files to process and which configuration to lint them
//! with, then reconciles the two engines' outputs into one result per file:
//!
//! - **File selection**: include patterns from the command line, pattern
//!   files or a layout-based fallback, minus standard exclusions,
//!   `.gitignore` and the `package.json` ignore list
//! - **Configuration composition**: a fixed sequence of named rule-set
//!   layers that can be disabled, replaced or extended, or one complete
//!   custom configuration
//! - **Processing**: format, then lint and fix the formatted text, then
//!   write the final text in place or under an output directory
//! - **Reporting**: render remaining problems; any output fails the run
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line argument parsing
//! - [`config`] - `fandl.toml` loading and option merging
//! - [`config_file`] - Loading of user-supplied configuration paths
//! - [`error`] - Centralized error types for the crate
//! - [`patterns`] - Pattern files and include/exclude pattern merging
//! - [`gitignore`] - `.gitignore` to exclusion globs
//! - [`package_settings`] - `package.json` ignores and project facts
//! - [`file_search`] - Filesystem search over glob sets
//! - [`file_selection`] - The set of files to process
//! - [`rule_sets`] - Lint configuration composition
//! - [`engine`] - The formatter and linter behind traits
//! - [`processor`] - Per-file format, lint, reconcile and write
//! - [`report`] - Report formatters and the exit policy
//! - [`run`] - One CLI invocation
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use fandl_core::{
//!     EslintCli, GlobFileSearch, LintConfig, PrettierCli, ProcessOptions, SelectFilesOptions,
//!     compose, effective_prettier_config, format_and_lint, select_files,
//! };
//! use fandl_core::rule_sets::ComposeOptions;
//! use std::path::Path;
//!
//! # fn main() -> fandl_core::Result<()> {
//! let root = Path::new(".");
//! let files = select_files(&SelectFilesOptions::new(root), &GlobFileSearch, &mut std::io::stderr())?;
//!
//! let config = LintConfig::Entries(compose(&ComposeOptions::default())?);
//! let prettier = PrettierCli::new("prettier", &effective_prettier_config(None))?;
//! let eslint = EslintCli::new("eslint", root, &config, true)?;
//!
//! let results = format_and_lint(&files, &prettier, &eslint, &ProcessOptions::new(root))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All functions that can fail return [`Result<T>`], which is a type alias for
//! `std::result::Result<T, FandlError>`. See the [`error`] module for details on
//! error types and handling.

// Module declarations
pub mod cli;
pub mod config;
pub mod config_file;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod file_search;
pub mod file_selection;
pub mod format_and_lint;
pub mod gitignore;
pub mod package_settings;
pub mod patterns;
pub mod processor;
pub mod report;
pub mod rule_sets;
pub mod run;

// Public API exports
pub use crate::cli::{Cli, Commands, RunArgs};
pub use crate::format_and_lint::format_and_lint;
pub use crate::processor::{ProcessOptions, process_files, reconcile};

// Config exports
pub use crate::config::{FandlConfig, Settings, discover_config, load_config, load_config_from_path};
pub use crate::config_file::load_config_file;

// Selection exports
pub use crate::file_search::{FileSearch, GlobFileSearch, SearchQuery};
pub use crate::file_selection::{SelectFilesOptions, select_files};
pub use crate::gitignore::NegationPolicy;
pub use crate::package_settings::ProjectSettings;
pub use crate::patterns::{extract_patterns, resolve_patterns};

// Composition exports
pub use crate::rule_sets::{ConfigEntry, LayerName, LintConfig, ModuleRef, RuleSets, compose};

// Engine exports
pub use crate::engine::{
    EslintCli, FormatEngine, LintEngine, LintMessage, LintResult, PrettierCli, Severity,
    effective_prettier_config,
};

// Report exports
pub use crate::report::{JsonFormatter, ReportFormatter, StylishFormatter, exit_code, load_formatter};

// Error exports
pub use crate::error::{FandlError, Result};
