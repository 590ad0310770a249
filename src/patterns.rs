//! Pattern files and pattern merging.
//!
//! A pattern file holds one glob per line. Blank lines and lines starting with
//! `#` are skipped, everything else is trimmed and kept in file order.

use crate::error::{FandlError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extracts the patterns from the text of a pattern file.
///
/// Any line-ending style is accepted.
///
/// # Examples
/// ```
/// use fandl_core::patterns::extract_patterns;
///
/// let patterns = extract_patterns("src2/*.mjs\n# foo\n  \nsrc/**/*.mjs\n\n");
/// assert_eq!(patterns, vec!["src2/*.mjs", "src/**/*.mjs"]);
/// ```
#[must_use]
pub fn extract_patterns(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Reads a pattern file and extracts its patterns.
///
/// # Errors
///
/// Returns an `IoError` naming the file when it cannot be read.
pub fn extract_patterns_from_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        FandlError::io_error_with_source("read pattern file", path.to_path_buf(), e)
    })?;
    Ok(extract_patterns(&text))
}

/// Concatenates explicit patterns with the patterns of each pattern file.
///
/// Explicit patterns come first, then each file's patterns in the order the
/// files are given. Duplicates are kept.
///
/// # Errors
///
/// Propagates the first pattern file read failure.
pub fn resolve_patterns(patterns: &[String], pattern_files: &[PathBuf]) -> Result<Vec<String>> {
    let mut resolved = patterns.to_vec();
    for file in pattern_files {
        resolved.extend(extract_patterns_from_file(file)?);
    }
    Ok(resolved)
}
