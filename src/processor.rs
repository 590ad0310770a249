//! Formats, lints and writes each selected file.
//!
//! Every file goes through read, format, lint, reconcile and write. The
//! format pass output is the lint pass input; the final text is the lint
//! fix when there is one, else the formatted text when it differs from what
//! was read, else nothing. Files are processed in parallel and the results
//! come back in input order.

use crate::engine::{FormatEngine, LintEngine, LintMessage, LintResult};
use crate::error::{FandlError, Result};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// How a batch is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Report only: no formatting, no fixing, no writing.
    pub check: bool,
    /// Compute results but never write.
    pub no_write: bool,
    /// Write every file under this directory instead of in place.
    pub output_dir: Option<PathBuf>,
    /// Prefix stripped from source paths to place them under `output_dir`.
    pub relative_stem: PathBuf,
}

impl ProcessOptions {
    /// In-place processing with `relative_stem` as the re-rooting prefix.
    pub fn new(relative_stem: impl Into<PathBuf>) -> Self {
        Self {
            check: false,
            no_write: false,
            output_dir: None,
            relative_stem: relative_stem.into(),
        }
    }

    fn writes(&self) -> bool {
        !self.check && !self.no_write
    }
}

/// Decides the final text of a file.
///
/// Returns `None` when neither pass changed anything.
///
/// # Examples
/// ```
/// use fandl_core::processor::reconcile;
///
/// assert_eq!(reconcile("a", "b", None), Some("b".to_string()));
/// assert_eq!(reconcile("a", "b", Some("c".to_string())), Some("c".to_string()));
/// assert_eq!(reconcile("a", "a", None), None);
/// ```
pub fn reconcile(original: &str, formatted: &str, lint_output: Option<String>) -> Option<String> {
    match lint_output {
        Some(fixed) => Some(fixed),
        None if formatted != original => Some(formatted.to_string()),
        None => None,
    }
}

/// Removes `.` components and folds `..` into its parent without touching
/// the filesystem. `..` above the root stays at the root.
///
/// # Examples
/// ```
/// use fandl_core::processor::normalize_path;
/// use std::path::Path;
///
/// assert_eq!(normalize_path(Path::new("/p/src/../lib/./a.js")), Path::new("/p/lib/a.js"));
/// assert_eq!(normalize_path(Path::new("../a/../b")), Path::new("../b"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Maps `file` under `output_dir` by stripping `relative_stem`.
///
/// All three paths are normalized first, so `stem/../other/a.js` is not
/// below `stem`.
///
/// # Errors
///
/// Returns `ArgumentInvalid` when `file` is not below `relative_stem`.
pub fn reroot(file: &Path, relative_stem: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file = normalize_path(file);
    let relative_stem = normalize_path(relative_stem);
    match file.strip_prefix(&relative_stem) {
        Ok(relative) => Ok(normalize_path(output_dir).join(relative)),
        Err(_) => Err(FandlError::argument_invalid_with_hint(
            format!(
                "Resolved input file path '{}' does not start with effective source stem '{}'.",
                file.display(),
                relative_stem.display()
            ),
            "Check input file paths/selection patterns and set or harmonize '--relative-stem' option if necessary.",
        )),
    }
}

/// Replaces `target` with `text` through a temporary file in the same directory.
fn write_atomic(target: &Path, text: &str) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .map_err(|e| FandlError::io_error_with_source("create output directory", dir.to_path_buf(), e))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| FandlError::io_error_with_source("create temporary file", dir.to_path_buf(), e))?;
    temp.write_all(text.as_bytes())
        .map_err(|e| FandlError::io_error_with_source("write file", target.to_path_buf(), e))?;
    if let Ok(metadata) = fs::metadata(target) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| FandlError::io_error_with_source("write file", target.to_path_buf(), e))?;
    }
    temp.persist(target)
        .map_err(|e| FandlError::io_error_with_source("write file", target.to_path_buf(), e.error))?;
    Ok(())
}

fn process_file(
    file: &Path,
    formatter: &dyn FormatEngine,
    linter: &dyn LintEngine,
    options: &ProcessOptions,
) -> Result<LintResult> {
    let original = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            debug!("Cannot read {}: {}", file.display(), e);
            return Ok(LintResult {
                file_path: file.to_path_buf(),
                messages: vec![LintMessage::fatal(format!("Cannot read file: {}", e))],
                output: None,
            });
        }
    };

    let formatted = if options.check {
        original.clone()
    } else {
        formatter.format(&original, file)?
    };

    let mut result = linter.lint_text(&formatted, file)?;
    result.file_path = file.to_path_buf();
    let lint_output = if options.check { None } else { result.output.take() };
    result.output = reconcile(&original, &formatted, lint_output);

    if options.writes() {
        let target = match &options.output_dir {
            Some(output_dir) => Some(reroot(file, &options.relative_stem, output_dir)?),
            None if result.output.is_some() => Some(file.to_path_buf()),
            None => None,
        };
        if let Some(target) = target {
            let text = result.output.as_deref().unwrap_or(&original);
            debug!("Writing {}", target.display());
            write_atomic(&target, text)?;
        }
    }

    Ok(result)
}

/// Processes `files` with shared engines and returns one result per file, in order.
///
/// A file that cannot be read yields a result holding a single fatal
/// message; engine and write failures abort the batch.
///
/// # Errors
///
/// Returns `ArgumentInvalid` before anything is processed when writing under
/// an output directory and some file is not below the relative stem.
#[instrument(skip_all, fields(files = files.len(), check = options.check))]
pub fn process_files(
    files: &[PathBuf],
    formatter: &dyn FormatEngine,
    linter: &dyn LintEngine,
    options: &ProcessOptions,
) -> Result<Vec<LintResult>> {
    if options.writes()
        && let Some(output_dir) = &options.output_dir
    {
        for file in files {
            reroot(file, &options.relative_stem, output_dir)?;
        }
    }

    files
        .par_iter()
        .map(|file| process_file(file, formatter, linter, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_prefers_lint_fix() {
        assert_eq!(
            reconcile("orig", "formatted", Some("fixed".to_string())),
            Some("fixed".to_string())
        );
        assert_eq!(reconcile("orig", "orig", Some("fixed".to_string())), Some("fixed".to_string()));
    }

    #[test]
    fn test_reconcile_falls_back_to_formatted_text() {
        assert_eq!(reconcile("orig", "formatted", None), Some("formatted".to_string()));
        assert_eq!(reconcile("same", "same", None), None);
    }

    #[test]
    fn test_reroot_is_component_wise() {
        let out = Path::new("/out");
        assert_eq!(
            reroot(Path::new("/proj/src/a/b.js"), Path::new("/proj/src"), out).expect("below stem"),
            PathBuf::from("/out/a/b.js")
        );
        let err = reroot(Path::new("/proj/srcx/b.js"), Path::new("/proj/src"), out).unwrap_err();
        assert!(matches!(err, FandlError::ArgumentInvalid { .. }));
        assert!(err.to_string().contains("does not start with effective source stem '/proj/src'"));
    }

    #[test]
    fn test_reroot_resolves_parent_components_before_matching() {
        let out = Path::new("/out");
        let err = reroot(Path::new("/proj/src/../other/a.js"), Path::new("/proj/src"), out).unwrap_err();
        assert!(matches!(err, FandlError::ArgumentInvalid { .. }));

        assert_eq!(
            reroot(Path::new("/proj/other/./a.js"), Path::new("/proj/src/../other"), Path::new("/x/../out"))
                .expect("below stem"),
            PathBuf::from("/out/a.js")
        );
    }

    #[test]
    fn test_reroot_never_escapes_output_dir() {
        let target = reroot(Path::new("/proj/src/a/../../b.js"), Path::new("/proj"), Path::new("/out"))
            .expect("below stem");
        assert_eq!(target, PathBuf::from("/out/b.js"));
    }

    #[test]
    fn test_normalize_path_keeps_leading_parents_of_relative_paths() {
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("../../a")), PathBuf::from("../../a"));
    }

    #[test]
    fn test_write_atomic_replaces_content_and_keeps_permissions() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let target = dir.path().join("a.js");
        fs::write(&target, "old").expect("Failed to write file");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).expect("chmod");
        }

        write_atomic(&target, "new").expect("write succeeds");
        assert_eq!(fs::read_to_string(&target).expect("readable"), "new");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).expect("metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o644);
        }
    }

    #[test]
    fn test_write_atomic_creates_parent_directories() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let target = dir.path().join("x").join("y").join("a.js");
        write_atomic(&target, "text").expect("write succeeds");
        assert_eq!(fs::read_to_string(&target).expect("readable"), "text");
    }
}
