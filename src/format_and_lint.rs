//! Library entry point for processing an explicit list of files.

use crate::engine::{FormatEngine, LintEngine, LintResult};
use crate::error::{FandlError, Result};
use crate::processor::{ProcessOptions, normalize_path, process_files};
use std::path::PathBuf;
use tracing::info;

/// Formats and lints `files`, writing results according to `options`.
///
/// Relative paths are made absolute against the working directory and
/// normalized first.
///
/// # Errors
///
/// Returns `ArgumentMissing` for an empty file list, otherwise whatever
/// [`process_files`] returns.
pub fn format_and_lint(
    files: &[PathBuf],
    formatter: &dyn FormatEngine,
    linter: &dyn LintEngine,
    options: &ProcessOptions,
) -> Result<Vec<LintResult>> {
    if files.is_empty() {
        return Err(FandlError::argument_missing(
            "files",
            "No files were given or selected for processing.",
        ));
    }

    let files = files
        .iter()
        .map(|file| std::path::absolute(file).map(|p| normalize_path(&p)))
        .collect::<std::io::Result<Vec<_>>>()?;
    info!("Processing {} files", files.len());
    process_files(&files, formatter, linter, options)
}
