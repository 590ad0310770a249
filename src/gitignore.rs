//! Reads `.gitignore` files into exclusion globs.
//!
//! Conversion follows the gitignore dialect:
//!
//! - a leading `/`, or a `/` anywhere but the end, anchors the pattern to the root
//! - unanchored patterns match at any depth (`foo` becomes `**/foo`)
//! - every pattern also excludes everything below a matching directory
//! - a trailing `/` restricts the pattern to directories
//!
//! Negated patterns (`!foo`) re-include files, which an exclusion list cannot
//! express. [`NegationPolicy`] decides whether they are fatal or dropped with a
//! warning.

use crate::error::{FandlError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Conventional name of the ignore file.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// What to do with `!pattern` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegationPolicy {
    /// Fail with a `ConfigurationConflict` on the first negated pattern.
    #[default]
    Strict,
    /// Write one warning per negated pattern and drop it.
    Warn,
}

/// Converts a single non-negated gitignore line into exclusion globs.
fn line_to_globs(line: &str) -> Vec<String> {
    let (pattern, dir_only) = match line.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (line, false),
    };
    let anchored = pattern.starts_with('/') || pattern.contains('/');
    let pattern = pattern.trim_start_matches('/');

    let base = if anchored || pattern.starts_with("**/") {
        pattern.to_string()
    } else {
        format!("**/{}", pattern)
    };

    if dir_only {
        vec![format!("{}/**", base)]
    } else {
        let below = format!("{}/**", base);
        vec![base, below]
    }
}

/// Converts gitignore text into exclusion globs.
///
/// # Arguments
/// * `text` - The content of the ignore file.
/// * `policy` - How negated patterns are handled.
/// * `warnings` - Where `Warn` mode writes its warnings.
///
/// # Errors
///
/// Returns `ConfigurationConflict` in `Strict` mode when a negated pattern is
/// present, or an `IoError` if a warning cannot be written.
pub fn gitignore_to_globs(
    text: &str,
    policy: NegationPolicy,
    warnings: &mut dyn Write,
) -> Result<Vec<String>> {
    let mut globs = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim_start().is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('!') {
            match policy {
                NegationPolicy::Strict => {
                    return Err(FandlError::configuration_conflict(
                        "'.gitignore' contains un-usable negative ignore pattern.",
                        "Rewrite the '.gitignore' patterns to factor out the negative patterns.",
                    ));
                }
                NegationPolicy::Warn => {
                    writeln!(warnings, "Negated '.gitignore' pattern '{}' will be ignored.", line)
                        .map_err(|e| {
                            FandlError::io_error_with_source(
                                "write warning",
                                GITIGNORE_FILE.into(),
                                e,
                            )
                        })?;
                    continue;
                }
            }
        }
        // `\#` and `\!` escape a literal leading character
        let line = line.strip_prefix('\\').unwrap_or(line);
        globs.extend(line_to_globs(line));
    }
    Ok(globs)
}

/// Reads an ignore file and converts it into exclusion globs.
///
/// A missing file yields an empty list; any other read failure is an error.
///
/// # Errors
///
/// See [`gitignore_to_globs`]; read failures other than "not found" are
/// returned as `IoError`.
pub fn process_gitignore(
    path: &Path,
    policy: NegationPolicy,
    warnings: &mut dyn Write,
) -> Result<Vec<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No ignore file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(FandlError::io_error_with_source(
                "read ignore file",
                path.to_path_buf(),
                e,
            ));
        }
    };
    gitignore_to_globs(&text, policy, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn convert(text: &str) -> Vec<String> {
        gitignore_to_globs(text, NegationPolicy::Strict, &mut io::sink())
            .expect("Failed to convert gitignore")
    }

    #[test]
    fn test_rooted_pattern_is_anchored() {
        assert_eq!(convert("/qa"), vec!["qa", "qa/**"]);
    }

    #[test]
    fn test_bare_name_matches_at_any_depth() {
        assert_eq!(convert("foo"), vec!["**/foo", "**/foo/**"]);
        assert_eq!(convert("*.a"), vec!["**/*.a", "**/*.a/**"]);
    }

    #[test]
    fn test_middle_slash_anchors() {
        assert_eq!(convert("doc/frontend"), vec!["doc/frontend", "doc/frontend/**"]);
    }

    #[test]
    fn test_trailing_slash_is_directory_only() {
        assert_eq!(convert("node_modules/"), vec!["**/node_modules/**"]);
        assert_eq!(convert("/build/"), vec!["build/**"]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        assert_eq!(convert("# deps\n\n   \n/dist\n"), vec!["dist", "dist/**"]);
    }

    #[test]
    fn test_escaped_hash_is_literal() {
        assert_eq!(convert("\\#notes"), vec!["**/#notes", "**/#notes/**"]);
    }

    #[test]
    fn test_strict_mode_rejects_negated_pattern() {
        let err = gitignore_to_globs("dist\n!build/\n", NegationPolicy::Strict, &mut io::sink())
            .unwrap_err();
        assert!(matches!(err, FandlError::ConfigurationConflict { .. }));
        assert!(err.to_string().contains("negative ignore pattern"));
    }

    #[test]
    fn test_warn_mode_drops_negated_pattern_with_warning() {
        let mut warnings = Vec::new();
        let globs = gitignore_to_globs("dist\n!build/\n!keep.js\n", NegationPolicy::Warn, &mut warnings)
            .expect("Failed to convert gitignore");
        assert_eq!(globs, vec!["**/dist", "**/dist/**"]);

        let warnings = String::from_utf8(warnings).expect("warnings are utf8");
        let lines: Vec<&str> = warnings.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Negated '.gitignore' pattern '!build/' will be ignored.",
                "Negated '.gitignore' pattern '!keep.js' will be ignored.",
            ]
        );
    }

    #[test]
    fn test_missing_ignore_file_is_empty() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let globs = process_gitignore(
            &dir.path().join(GITIGNORE_FILE),
            NegationPolicy::Strict,
            &mut io::sink(),
        )
        .expect("Missing file should not be an error");
        assert!(globs.is_empty());
    }

    #[test]
    fn test_process_gitignore_reads_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(GITIGNORE_FILE);
        fs::write(&path, "/coverage\n").expect("Failed to write gitignore");
        let globs = process_gitignore(&path, NegationPolicy::Warn, &mut io::sink())
            .expect("Failed to process gitignore");
        assert_eq!(globs, vec!["coverage", "coverage/**"]);
    }

    #[test]
    fn test_unreadable_ignore_path_is_io_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        // a directory cannot be read as a file
        let err = process_gitignore(dir.path(), NegationPolicy::Strict, &mut io::sink())
            .unwrap_err();
        assert!(matches!(err, FandlError::IoError { .. }));
    }
}
