//! Source file extensions recognized by the default configuration.

/// Plain JavaScript extensions.
pub const STD_EXTS: &[&str] = &[".js", ".cjs", ".mjs"];

/// JSX extensions.
pub const JSX_EXTS: &[&str] = &[".jsx"];

/// Every extension fandl processes by default.
pub const ALL_EXTS: &[&str] = &[".js", ".cjs", ".mjs", ".jsx"];

/// Returns a brace group matching every extension in `exts`, e.g. `{.js,.cjs}`.
///
/// Append it to a glob stem: `**/*` + `{.js,.cjs}`.
#[must_use]
pub fn ext_group(exts: &[&str]) -> String {
    format!("{{{}}}", exts.join(","))
}
