//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI options and subcommands.
///
/// Without a subcommand the top-level flags run `format-and-lint`.
#[derive(Parser, Debug)]
#[command(
    name = "fandl",
    version,
    about = "Format and lint JavaScript sources with prettier and eslint",
    long_about = "fandl selects JavaScript sources, formats them with prettier, lints the result with a layered eslint configuration and writes the reconciled text back.\n\nConfiguration precedence: CLI > fandl.toml > defaults.",
    after_help = "Examples:\n  fandl\n  fandl lint --files 'src/**/*.mjs'\n  fandl --output-dir dist --relative-stem src\n  fandl show-eslint-config --rule-sets-path rule-sets.yaml",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub args: RunArgs,
}

impl Cli {
    /// The command to run, `format-and-lint` when none was named.
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or(Commands::FormatAndLint(self.args))
    }
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format, lint and fix the selected files
    #[command(
        about = "Format, lint and fix the selected files (default)",
        long_about = "Format each selected file, lint and fix the formatted text, then write the result in place or under --output-dir. Remaining problems are reported and fail the run."
    )]
    FormatAndLint(RunArgs),
    /// Report problems without changing files
    #[command(
        about = "Lint the selected files without writing",
        long_about = "Lint each selected file as it is on disk. Nothing is formatted, fixed or written."
    )]
    Lint(RunArgs),
    /// Print the composed eslint configuration
    #[command(
        about = "Print the composed eslint configuration as JSON",
        after_help = "Examples:\n  fandl show-eslint-config\n  fandl show-eslint-config --rule-sets-path rule-sets.json"
    )]
    ShowEslintConfig(RunArgs),
    /// Print the effective prettier options
    #[command(about = "Print the effective prettier options as JSON")]
    ShowPrettierConfig(RunArgs),
    /// Show version
    #[command(about = "Show version")]
    Version,
}

/// Flags shared by every command that selects files or composes configuration.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Project config file (default: fandl.toml or .fandl.toml found upward)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Include glob pattern; repeatable
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub files: Vec<String>,

    /// File of newline-delimited include patterns; repeatable
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub files_paths: Vec<PathBuf>,

    /// Exclude glob pattern; repeatable
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub ignore_files: Vec<String>,

    /// File of newline-delimited exclude patterns; repeatable
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub ignore_files_paths: Vec<PathBuf>,

    /// Search root (default: current dir)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Complete eslint configuration (.json, .yaml, .toml or a JS module)
    #[arg(long, value_name = "PATH")]
    pub eslint_config_path: Option<PathBuf>,

    /// Adjustments to the default rule sets (.json, .yaml, .toml or a JS module)
    #[arg(long, value_name = "PATH")]
    pub rule_sets_path: Option<PathBuf>,

    /// Do not read ignore patterns from package.json
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub ignore_package_settings: bool,

    /// Do not apply the built-in and .gitignore exclusions
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_standard_ignores: bool,

    /// Write results under this directory instead of in place
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Prefix stripped from source paths under --output-dir (default: current dir)
    #[arg(long, value_name = "PATH")]
    pub relative_stem: Option<PathBuf>,

    /// Complete prettier options (.json, .yaml, .toml or a JS module)
    #[arg(long, value_name = "PATH")]
    pub prettier_config_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).expect("valid arguments").into_command()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_runs_format_and_lint() {
        let Commands::FormatAndLint(args) = parse(&["fandl", "--files", "a/**/*.js", "b.mjs", "-o", "out"]) else {
            panic!("expected format-and-lint");
        };
        assert_eq!(args.files, vec!["a/**/*.js", "b.mjs"]);
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_repeated_flags_accumulate() {
        let Commands::Lint(args) = parse(&["fandl", "lint", "--ignore-files", "x", "--ignore-files", "y"]) else {
            panic!("expected lint");
        };
        assert_eq!(args.ignore_files, vec!["x", "y"]);
    }

    #[test]
    fn test_boolean_flags() {
        let Commands::FormatAndLint(args) = parse(&[
            "fandl",
            "format-and-lint",
            "--no-standard-ignores",
            "--ignore-package-settings",
        ]) else {
            panic!("expected format-and-lint");
        };
        assert!(args.no_standard_ignores);
        assert!(args.ignore_package_settings);
    }

    #[test]
    fn test_show_commands_and_version() {
        assert!(matches!(
            parse(&["fandl", "show-eslint-config", "--rule-sets-path", "r.json"]),
            Commands::ShowEslintConfig(RunArgs { rule_sets_path: Some(_), .. })
        ));
        assert!(matches!(parse(&["fandl", "show-prettier-config"]), Commands::ShowPrettierConfig(_)));
        assert!(matches!(parse(&["fandl", "version"]), Commands::Version));
    }
}
