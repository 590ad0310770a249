//! fandl: format JavaScript sources with prettier and lint them with eslint.
//!
//! USAGE EXAMPLE (run from a project root):
//!   fandl
//!   fandl lint --files 'src/**/*.mjs'
//!
//! Set `RUST_LOG=fandl_core=debug` to see the selection patterns and engine
//! command lines on stderr.

use clap::Parser;
use color_eyre::eyre::Result;
use fandl_core::cli::Cli;
use fandl_core::run::run;
use std::io;
use std::process::exit;

fn main() -> Result<()> {
    color_eyre::install()?;
    // Logs go to stderr; stdout carries only the report.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    tracing::debug!("Parsed CLI arguments: {:?}", cli);
    let cwd = std::env::current_dir()?;

    let code = match run(cli.into_command(), &cwd, &mut io::stdout().lock(), &mut io::stderr()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("Hint: {}", hint);
            }
            for suggestion in e.suggestions() {
                tracing::debug!("Suggestion: {}", suggestion);
            }
            1
        }
    };
    exit(code);
}
