//! Resolves the set of files to process.
//!
//! Include patterns come from `--files` then `--files-paths`; when both are
//! empty a fallback picks every source file under the root (if a root
//! `index` file exists) or under `src`. Exclude patterns come from
//! `--ignore-files` and `--ignore-files-paths`, then the standard ignores and
//! `.gitignore`, then the manifest's `devPkg.linting.ignores`.

use crate::error::{FandlError, Result};
use crate::extensions::{ALL_EXTS, ext_group};
use crate::file_search::{FileSearch, SearchQuery};
use crate::gitignore::{GITIGNORE_FILE, NegationPolicy, process_gitignore};
use crate::package_settings::{PACKAGE_FILE, process_package_ignores};
use crate::patterns::resolve_patterns;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Exclusions applied unless standard ignores are switched off.
pub const STANDARD_IGNORES: &[&str] = &["**/test/data/**/*", "doc/**", "dist/**"];

/// Root files whose presence means the whole tree is source.
pub const ROOT_INDEX_FILES: &[&str] = &["index.js", "index.mjs", "index.cjs"];

/// Options for [`select_files`].
#[derive(Debug, Clone)]
pub struct SelectFilesOptions {
    /// Explicit include patterns.
    pub files: Vec<String>,
    /// Files holding include patterns, one per line.
    pub files_paths: Vec<PathBuf>,
    /// Explicit exclude patterns.
    pub ignore_files: Vec<String>,
    /// Files holding exclude patterns, one per line.
    pub ignore_files_paths: Vec<PathBuf>,
    /// Search root; also where `.gitignore` and `package.json` are read.
    pub root: PathBuf,
    /// Skip the standard ignores and `.gitignore`.
    pub no_standard_ignores: bool,
    /// Skip the manifest's ignore list.
    pub ignore_package_settings: bool,
    /// How negated `.gitignore` patterns are handled.
    pub negation_policy: NegationPolicy,
}

impl SelectFilesOptions {
    /// Creates options that select the default patterns under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            files: Vec::new(),
            files_paths: Vec::new(),
            ignore_files: Vec::new(),
            ignore_files_paths: Vec::new(),
            root: root.into(),
            no_standard_ignores: false,
            ignore_package_settings: false,
            negation_policy: NegationPolicy::Warn,
        }
    }
}

/// Picks include patterns from the layout of `root`.
///
/// # Errors
///
/// Returns `ArgumentInvalid` when `root` has neither an index file nor a `src` directory.
pub fn default_include_patterns(root: &std::path::Path) -> Result<Vec<String>> {
    let exts = ext_group(ALL_EXTS);
    if ROOT_INDEX_FILES.iter().any(|f| root.join(f).exists()) {
        Ok(vec![format!("**/*{}", exts)])
    } else if root.join("src").exists() {
        Ok(vec![format!("src/**/*{}", exts)])
    } else {
        Err(FandlError::argument_invalid_with_hint(
            "Did not find root index nor 'src' directory to indicate default matching pattern.",
            "Specify '--files' or '--files-paths'.",
        ))
    }
}

/// Computes the effective include patterns.
///
/// # Errors
///
/// Propagates pattern file read failures and the fallback failure.
pub fn resolve_include_patterns(options: &SelectFilesOptions) -> Result<Vec<String>> {
    let patterns = resolve_patterns(&options.files, &options.files_paths)?;
    if patterns.is_empty() {
        return default_include_patterns(&options.root);
    }
    Ok(patterns)
}

/// Computes the effective exclude patterns.
///
/// # Errors
///
/// Propagates pattern file, `.gitignore` and manifest failures.
pub fn resolve_exclude_patterns(
    options: &SelectFilesOptions,
    warnings: &mut dyn Write,
) -> Result<Vec<String>> {
    let mut patterns = resolve_patterns(&options.ignore_files, &options.ignore_files_paths)?;
    if !options.no_standard_ignores {
        patterns.extend(STANDARD_IGNORES.iter().map(|s| s.to_string()));
        patterns.extend(process_gitignore(
            &options.root.join(GITIGNORE_FILE),
            options.negation_policy,
            warnings,
        )?);
    }
    if !options.ignore_package_settings {
        patterns.extend(process_package_ignores(&options.root.join(PACKAGE_FILE))?);
    }
    Ok(patterns)
}

/// Selects the files to process.
///
/// The order is the order `search` yields; it is not re-sorted here.
///
/// # Arguments
/// * `options` - Pattern sources and switches.
/// * `search` - The filesystem search collaborator.
/// * `warnings` - Receives warnings about dropped `.gitignore` patterns.
///
/// # Errors
///
/// Returns the first failure among pattern resolution and the search itself.
#[instrument(skip_all, fields(root = %options.root.display()))]
pub fn select_files(
    options: &SelectFilesOptions,
    search: &dyn FileSearch,
    warnings: &mut dyn Write,
) -> Result<Vec<PathBuf>> {
    let include = resolve_include_patterns(options)?;
    let exclude = resolve_exclude_patterns(options, warnings)?;
    debug!(?include, ?exclude, "Resolved selection patterns");

    search.search(&SearchQuery {
        root: options.root.clone(),
        include,
        exclude,
        files_only: true,
    })
}
