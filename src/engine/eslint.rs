//! ESLint as a [`LintEngine`].
//!
//! The composed configuration is rendered into an ES module, written below
//! the project's `node_modules` so its `import`s resolve against the
//! project's installed plugins, and handed to `eslint --config`. A user's
//! own config module is re-exported instead. eslint runs from the project
//! root, which is the base of every `files` and `ignores` pattern.

use super::process::{exit_error, run_with_input};
use super::{LintEngine, LintResult, parse_engine_json};
use crate::error::{FandlError, Result};
use crate::processor::normalize_path;
use crate::rule_sets::{ConfigEntry, LintConfig, ModuleRef};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

const ENGINE: &str = "eslint";

/// Directory (relative to the project root) holding generated config modules.
pub const CACHE_DIR: &str = "node_modules/.cache/fandl";

const MODULE_PRELUDE: &str = "const omit = (rules, ids) => {
  const copy = { ...rules }
  for (const id of ids) delete copy[id]
  return copy
}
";

/// Tracks the packages imported by a generated module.
#[derive(Debug, Default)]
struct Imports {
    packages: Vec<String>,
}

impl Imports {
    fn expr(&mut self, module: &ModuleRef) -> String {
        let index = match self.packages.iter().position(|p| *p == module.package) {
            Some(index) => index,
            None => {
                self.packages.push(module.package.clone());
                self.packages.len() - 1
            }
        };
        let mut expr = format!("m{}", index);
        for member in &module.member {
            expr.push('[');
            expr.push_str(&js_string(member));
            expr.push(']');
        }
        expr
    }
}

fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn render_entry(entry: &ConfigEntry, imports: &mut Imports) -> Result<String> {
    let mut plain = entry.clone();
    let plugins = std::mem::take(&mut plain.plugins);
    let presets = std::mem::take(&mut plain.rule_presets);
    let omitted = std::mem::take(&mut plain.omit_rules);
    let language_options = plain.language_options.take();
    let rules = if presets.is_empty() && omitted.is_empty() {
        None
    } else {
        Some(std::mem::take(&mut plain.rules))
    };

    let mut parts = vec![format!("...{}", serde_json::to_string(&plain)?)];

    if !plugins.is_empty() {
        let bindings: Vec<String> = plugins
            .iter()
            .map(|(namespace, module)| format!("{}: {}", js_string(namespace), imports.expr(module)))
            .collect();
        parts.push(format!("plugins: {{ {} }}", bindings.join(", ")));
    }

    if let Some(mut options) = language_options {
        let presets = std::mem::take(&mut options.global_presets);
        let globals = std::mem::take(&mut options.globals);
        let mut spread: Vec<String> = presets.iter().map(|p| format!("...{}", imports.expr(p))).collect();
        spread.push(format!("...{}", serde_json::to_string(&globals)?));
        parts.push(format!(
            "languageOptions: {{ ...{}, globals: {{ {} }} }}",
            serde_json::to_string(&options)?,
            spread.join(", ")
        ));
    }

    if let Some(rules) = rules {
        let spread: Vec<String> = presets.iter().map(|p| format!("...{}", imports.expr(p))).collect();
        parts.push(format!(
            "rules: {{ ...omit({{ {} }}, {}), ...{} }}",
            spread.join(", "),
            serde_json::to_string(&omitted)?,
            serde_json::to_string(&rules)?
        ));
    }

    Ok(format!("{{ {} }}", parts.join(", ")))
}

/// Renders `entries` as an ES module whose default export is the flat config.
///
/// # Errors
///
/// Fails only if an entry cannot be serialized.
pub fn render_config_module(entries: &[ConfigEntry]) -> Result<String> {
    let mut imports = Imports::default();
    let rendered = entries
        .iter()
        .map(|entry| render_entry(entry, &mut imports))
        .collect::<Result<Vec<_>>>()?;

    let mut module = String::from("// Generated by fandl. Do not edit.\n");
    for (index, package) in imports.packages.iter().enumerate() {
        module.push_str(&format!("import m{} from {}\n", index, js_string(package)));
    }
    module.push('\n');
    module.push_str(MODULE_PRELUDE);
    module.push_str("\nexport default [\n");
    for entry in rendered {
        module.push_str("  ");
        module.push_str(&entry);
        module.push_str(",\n");
    }
    module.push_str("]\n");
    Ok(module)
}

/// `file://` URL of an absolute path, percent-encoding everything outside
/// the unreserved set.
fn file_url(path: &Path) -> String {
    let mut url = String::from("file://");
    let text = path.to_string_lossy().replace('\\', "/");
    if !text.starts_with('/') {
        url.push('/');
    }
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'/' | b'-' | b'_' | b'.' | b'~' | b':' => {
                url.push(char::from(byte));
            }
            _ => url.push_str(&format!("%{:02X}", byte)),
        }
    }
    url
}

/// Renders a module re-exporting the default export of the config module at `path`.
///
/// # Examples
/// ```
/// use fandl_core::engine::eslint::render_reexport_module;
/// use std::path::Path;
///
/// let module = render_reexport_module(Path::new("/p/eslint.config.mjs"));
/// assert!(module.ends_with("export { default } from \"file:///p/eslint.config.mjs\"\n"));
/// ```
pub fn render_reexport_module(path: &Path) -> String {
    format!(
        "// Generated by fandl. Do not edit.\nexport {{ default }} from {}\n",
        js_string(&file_url(path))
    )
}

/// Runs the `eslint` executable once per file.
#[derive(Debug)]
pub struct EslintCli {
    bin: PathBuf,
    config_module: NamedTempFile,
    cwd: PathBuf,
    fix: bool,
}

impl EslintCli {
    /// Writes `config` as a module under `<root>/node_modules/.cache/fandl`.
    ///
    /// # Arguments
    /// * `bin` - The eslint executable.
    /// * `root` - The project root. Its `node_modules` provides the plugins
    ///   and eslint runs from it.
    /// * `config` - The composed entries or a user config module.
    /// * `fix` - Whether fixes are computed (`--fix-dry-run`).
    ///
    /// # Errors
    ///
    /// Returns an `IoError` when the module cannot be written.
    pub fn new(bin: impl Into<PathBuf>, root: &Path, config: &LintConfig, fix: bool) -> Result<Self> {
        let root = std::path::absolute(root)
            .map(|p| normalize_path(&p))
            .map_err(|e| FandlError::io_error_with_source("resolve project root", root.to_path_buf(), e))?;
        let module = match config {
            LintConfig::Entries(entries) => render_config_module(entries)?,
            LintConfig::Module(path) => {
                let path = std::path::absolute(path).map_err(|e| {
                    FandlError::io_error_with_source("resolve eslint config", path.clone(), e)
                })?;
                render_reexport_module(&normalize_path(&path))
            }
        };

        let dir = root.join(CACHE_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| FandlError::io_error_with_source("create config cache", dir.clone(), e))?;
        let mut config_module = tempfile::Builder::new()
            .prefix("eslint.config.")
            .suffix(".mjs")
            .tempfile_in(&dir)
            .map_err(|e| FandlError::io_error_with_source("create eslint config", dir.clone(), e))?;
        config_module.write_all(module.as_bytes()).map_err(|e| {
            FandlError::io_error_with_source("write eslint config", config_module.path().to_path_buf(), e)
        })?;
        debug!("Wrote eslint config to {}", config_module.path().display());
        Ok(Self {
            bin: bin.into(),
            config_module,
            cwd: root,
            fix,
        })
    }

    /// Path of the generated config module.
    pub fn config_path(&self) -> &Path {
        self.config_module.path()
    }
}

impl LintEngine for EslintCli {
    #[instrument(skip(self, text))]
    fn lint_text(&self, text: &str, path: &Path) -> Result<LintResult> {
        let mut command = Command::new(&self.bin);
        command
            .arg("--config")
            .arg(self.config_module.path())
            .arg("--stdin")
            .arg("--stdin-filename")
            .arg(path)
            .arg("--format")
            .arg("json")
            .arg("--no-warn-ignored");
        if self.fix {
            command.arg("--fix-dry-run");
        }
        command.current_dir(&self.cwd);

        let output = run_with_input(ENGINE, &mut command, text)?;
        // 0: clean, 1: lint errors, anything else: eslint itself failed
        match output.status.code() {
            Some(0) | Some(1) => {}
            _ => return Err(exit_error(ENGINE, &output)),
        }

        let results: Vec<LintResult> = parse_engine_json(ENGINE, &output.stdout)?;
        Ok(results
            .into_iter()
            .next()
            .unwrap_or_else(|| LintResult::clean(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_sets::{LanguageOptions, compose, ComposeOptions};
    use serde_json::{Map, json};
    use tempfile::TempDir;

    fn module(package: &str, member: &[&str]) -> ModuleRef {
        ModuleRef {
            package: package.to_string(),
            member: member.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_plain_entry_is_spread_verbatim() {
        let entry = ConfigEntry {
            files: Some(vec!["**/*.js".to_string()]),
            rules: Map::from_iter([("semi".to_string(), json!("error"))]),
            ..ConfigEntry::default()
        };
        let module = render_config_module(&[entry]).expect("renders");
        assert_eq!(
            module,
            "// Generated by fandl. Do not edit.\n\
             \n\
             const omit = (rules, ids) => {\n  const copy = { ...rules }\n  for (const id of ids) delete copy[id]\n  return copy\n}\n\
             \n\
             export default [\n  { ...{\"files\":[\"**/*.js\"],\"rules\":{\"semi\":\"error\"}} },\n]\n"
        );
    }

    #[test]
    fn test_render_presets_and_omissions() {
        let entry = ConfigEntry {
            name: Some("x".to_string()),
            rule_presets: vec![module("@eslint/js", &["configs", "recommended", "rules"])],
            omit_rules: vec!["no-undef".to_string()],
            rules: Map::from_iter([("semi".to_string(), json!("error"))]),
            ..ConfigEntry::default()
        };
        let module = render_config_module(&[entry]).expect("renders");
        assert!(module.contains("import m0 from \"@eslint/js\"\n"));
        assert!(module.contains(
            "  { ...{\"name\":\"x\"}, rules: { ...omit({ ...m0[\"configs\"][\"recommended\"][\"rules\"] }, [\"no-undef\"]), ...{\"semi\":\"error\"} } },\n"
        ));
    }

    #[test]
    fn test_render_plugins_and_globals_share_imports() {
        let entries = vec![
            ConfigEntry {
                plugins: [("n".to_string(), module("eslint-plugin-n", &[]))].into_iter().collect(),
                language_options: Some(LanguageOptions {
                    global_presets: vec![module("globals", &["node"])],
                    ..LanguageOptions::default()
                }),
                ..ConfigEntry::default()
            },
            ConfigEntry {
                plugins: [("n".to_string(), module("eslint-plugin-n", &[]))].into_iter().collect(),
                ..ConfigEntry::default()
            },
        ];
        let module = render_config_module(&entries).expect("renders");
        assert_eq!(module.matches("import ").count(), 2);
        assert!(module.contains("plugins: { \"n\": m0 }"));
        assert!(module.contains("languageOptions: { ...{}, globals: { ...m1[\"node\"], ...{} } }"));
    }

    #[test]
    fn test_render_default_composition_imports_each_package_once() {
        let entries = compose(&ComposeOptions::default()).expect("composes");
        let module = render_config_module(&entries).expect("renders");
        assert_eq!(module.matches("from \"eslint-plugin-jsdoc\"").count(), 1);
        assert_eq!(module.matches("from \"@stylistic/eslint-plugin\"").count(), 1);
        assert_eq!(module.matches("\n  { ").count(), entries.len());
    }

    #[test]
    fn test_new_writes_module_under_node_modules_cache() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = LintConfig::Entries(Vec::new());
        let eslint = EslintCli::new("eslint", dir.path(), &config, false).expect("Failed to create engine");
        assert!(eslint.config_path().starts_with(dir.path().join(CACHE_DIR)));
        let written = fs::read_to_string(eslint.config_path()).expect("module exists");
        assert!(written.contains("export default [\n]"));
    }

    #[test]
    fn test_user_module_is_reexported_not_evaluated() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let user_config = dir.path().join("eslint.config.mjs");
        fs::write(
            &user_config,
            "const local = { rules: { 'no-foo': { create: () => ({}) } } }\nexport default [{ plugins: { local } }]\n",
        )
        .expect("Failed to write config");

        let config = LintConfig::Module(dir.path().join("sub").join("..").join("eslint.config.mjs"));
        let eslint = EslintCli::new("eslint", dir.path(), &config, false).expect("Failed to create engine");
        let written = fs::read_to_string(eslint.config_path()).expect("module exists");
        assert_eq!(written, render_reexport_module(&user_config));
        assert!(!written.contains("plugins"));
    }

    #[test]
    fn test_file_url_percent_encodes_reserved_characters() {
        assert_eq!(file_url(Path::new("/a b/#c%.mjs")), "file:///a%20b/%23c%25.mjs");
    }

    #[cfg(unix)]
    #[test]
    fn test_lint_runs_from_project_root_with_expected_arguments() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().join("project");
        fs::create_dir_all(root.join("src")).expect("Failed to create project");
        let bin = dir.path().join("fake-eslint");
        fs::write(
            &bin,
            "#!/bin/sh\npwd > \"$0.cwd\"\nprintf '%s\\n' \"$@\" > \"$0.args\"\ncat > /dev/null\nprintf '[]'\n",
        )
        .expect("Failed to write script");
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).expect("chmod");

        let config = LintConfig::Entries(Vec::new());
        let eslint = EslintCli::new(&bin, &root, &config, true).expect("Failed to create engine");
        let file = root.join("src").join("a.js");
        let result = eslint.lint_text("let a = 1\n", &file).expect("lint runs");
        assert_eq!(result, LintResult::clean(&file));

        let cwd = fs::read_to_string(dir.path().join("fake-eslint.cwd")).expect("cwd recorded");
        assert_eq!(
            fs::canonicalize(cwd.trim_end()).expect("cwd exists"),
            fs::canonicalize(&root).expect("root exists")
        );
        let args = fs::read_to_string(dir.path().join("fake-eslint.args")).expect("args recorded");
        let expected = [
            "--config".to_string(),
            eslint.config_path().display().to_string(),
            "--stdin".to_string(),
            "--stdin-filename".to_string(),
            file.display().to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--no-warn-ignored".to_string(),
            "--fix-dry-run".to_string(),
        ];
        assert_eq!(args.lines().collect::<Vec<_>>(), expected);
    }
}
