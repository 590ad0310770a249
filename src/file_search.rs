//! Filesystem search: evaluates include globs minus exclude globs under a root.
//!
//! Globs are matched against paths relative to the root, written with `/`
//! separators. `*` stays within one path segment while `**` crosses
//! segments. Results are absolute and deterministic: within each directory,
//! files come before subdirectories and both are ordered by name.

use crate::error::{FandlError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

/// One search request.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Directory the globs are relative to.
    pub root: PathBuf,
    /// Paths matching any of these are selected.
    pub include: Vec<String>,
    /// Paths matching any of these are dropped, even when included.
    pub exclude: Vec<String>,
    /// Only return regular files.
    pub files_only: bool,
}

/// A filesystem search collaborator.
pub trait FileSearch {
    /// Returns the absolute, duplicate-free paths selected by `query`.
    ///
    /// # Errors
    ///
    /// Fails on invalid globs or when the root cannot be traversed.
    fn search(&self, query: &SearchQuery) -> Result<Vec<PathBuf>>;
}

/// [`FileSearch`] over `walkdir` and `globset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobFileSearch;

/// Compiles `globs` into one set.
///
/// # Errors
///
/// Returns `ArgumentInvalid` naming the first glob that does not parse.
pub fn compile_globs(globs: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for g in globs {
        let glob = GlobBuilder::new(g)
            .literal_separator(true)
            .build()
            .map_err(|e| FandlError::argument_invalid(format!("Invalid file pattern '{}': {}", g, e)))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Directory globs whose every descendant is matched by one of `globs`:
/// the stems of patterns ending in `/**` or `/**/*`.
fn subtree_globs(globs: &[String]) -> Vec<String> {
    globs
        .iter()
        .filter_map(|g| g.strip_suffix("/**/*").or_else(|| g.strip_suffix("/**")))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .collect()
}

fn relative_str(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect();
    Some(parts.join("/"))
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

impl FileSearch for GlobFileSearch {
    #[instrument(skip(self), fields(root = %query.root.display()))]
    fn search(&self, query: &SearchQuery) -> Result<Vec<PathBuf>> {
        let include = compile_globs(&query.include)?;
        let exclude = compile_globs(&query.exclude)?;
        let excluded_subtrees = compile_globs(&subtree_globs(&query.exclude))?;
        let root = std::path::absolute(&query.root).map_err(|e| {
            FandlError::io_error_with_source("resolve search root", query.root.clone(), e)
        })?;

        // Only directories whose whole subtree is excluded are pruned.
        let pruned = |entry: &DirEntry| -> bool {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return false;
            }
            relative_str(entry.path(), &root).is_some_and(|rel| excluded_subtrees.is_match(&rel))
        };

        let mut found = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|e| !pruned(e));
        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            let is_file = entry.file_type().is_file();
            if query.files_only && !is_file {
                continue;
            }
            let Some(rel) = relative_str(entry.path(), &root) else {
                continue;
            };
            if include.is_match(&rel) && !exclude.is_match(&rel) {
                found.push(entry.into_path());
            }
        }

        debug!("Search matched {} paths", found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().expect("file has parent")).expect("Failed to create dir");
            fs::write(&path, "").expect("Failed to write file");
        }
        dir
    }

    fn search(root: &Path, include: &[&str], exclude: &[&str]) -> Vec<String> {
        let query = SearchQuery {
            root: root.to_path_buf(),
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            files_only: true,
        };
        GlobFileSearch
            .search(&query)
            .expect("Search failed")
            .into_iter()
            .map(|p| relative_str(&p, root).expect("result under root"))
            .collect()
    }

    #[test]
    fn test_files_come_before_subdirectories() {
        let dir = tree(&["lib/lib.cjs", "script.js", "index.mjs"]);
        assert_eq!(
            search(dir.path(), &["**/*{.js,.cjs,.mjs,.jsx}"], &[]),
            vec!["index.mjs", "script.js", "lib/lib.cjs"]
        );
    }

    #[test]
    fn test_results_are_absolute() {
        let dir = tree(&["a.js"]);
        let query = SearchQuery {
            root: dir.path().to_path_buf(),
            include: vec!["*.js".to_string()],
            exclude: Vec::new(),
            files_only: true,
        };
        let found = GlobFileSearch.search(&query).expect("Search failed");
        assert!(found.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let dir = tree(&["src2/a.mjs", "src2/deep/b.mjs"]);
        assert_eq!(search(dir.path(), &["src2/*.mjs"], &[]), vec!["src2/a.mjs"]);
    }

    #[test]
    fn test_exclude_removes_included_files() {
        let dir = tree(&["src/a.js", "dist/a.js", "test/data/x.js", "test/a.js"]);
        assert_eq!(
            search(dir.path(), &["**/*.js"], &["dist/**", "**/test/data/**/*"]),
            vec!["src/a.js", "test/a.js"]
        );
    }

    #[test]
    fn test_single_level_exclude_keeps_deeper_files() {
        let dir = tree(&["src/a.js", "src/sub/b.js", "src/sub/deep/c.js"]);
        assert_eq!(
            search(dir.path(), &["**/*.js"], &["src/*"]),
            vec!["src/sub/b.js", "src/sub/deep/c.js"]
        );
    }

    #[test]
    fn test_subtree_globs_take_recursive_stems_only() {
        let globs: Vec<String> = ["dist/**", "**/test/data/**/*", "src/*", "**", "/**"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(subtree_globs(&globs), vec!["dist", "**/test/data"]);
    }

    #[test]
    fn test_overlapping_includes_do_not_duplicate() {
        let dir = tree(&["src/a.js"]);
        assert_eq!(search(dir.path(), &["src/**/*.js", "**/*.js"], &[]), vec!["src/a.js"]);
    }

    #[test]
    fn test_files_only_false_returns_directories() {
        let dir = tree(&["src/a.js"]);
        let query = SearchQuery {
            root: dir.path().to_path_buf(),
            include: vec!["src".to_string(), "src/*".to_string()],
            exclude: Vec::new(),
            files_only: false,
        };
        let found = GlobFileSearch.search(&query).expect("Search failed");
        assert_eq!(found.len(), 2);
        assert!(found[0].is_dir());
    }

    #[test]
    fn test_invalid_glob_is_argument_invalid() {
        let dir = tree(&[]);
        let query = SearchQuery {
            root: dir.path().to_path_buf(),
            include: vec!["src/{a".to_string()],
            exclude: Vec::new(),
            files_only: true,
        };
        let err = GlobFileSearch.search(&query).unwrap_err();
        assert!(matches!(err, FandlError::ArgumentInvalid { .. }));
        assert!(err.to_string().contains("src/{a"));
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let dir = tree(&[]);
        let query = SearchQuery {
            root: dir.path().join("absent"),
            include: vec!["**".to_string()],
            exclude: Vec::new(),
            files_only: true,
        };
        assert!(matches!(GlobFileSearch.search(&query), Err(FandlError::IoError { .. })));
    }
}
