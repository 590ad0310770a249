//! Running engine executables with text on stdin.

use crate::error::{FandlError, Result};
use std::io::{self, Write};
use std::process::{Command, Output, Stdio};
use std::thread;
use tracing::debug;

fn spawn_error(engine: &str, command: &Command, err: io::Error) -> FandlError {
    let message = if err.kind() == io::ErrorKind::NotFound {
        format!(
            "{:?} not found. Please ensure it is installed in node_modules or on your PATH.",
            command.get_program()
        )
    } else {
        format!("Failed to execute {:?}: {}", command.get_program(), err)
    };
    FandlError::EngineError {
        engine: engine.to_string(),
        message,
        source: Some(Box::new(err)),
    }
}

/// Runs `command`, feeding `input` to its stdin, and collects its output.
///
/// Stdin is written from a separate thread so a child that fills its stdout
/// pipe before reading all of its input cannot deadlock.
///
/// # Errors
///
/// Returns an `EngineError` when the command cannot be started or its stdin
/// cannot be written. A non-zero exit status is not an error here.
pub fn run_with_input(engine: &str, command: &mut Command, input: &str) -> Result<Output> {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    debug!("Executing command: {:?}", command);

    let mut child = command
        .spawn()
        .map_err(|e| spawn_error(engine, command, e))?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| FandlError::engine_error(engine, "stdin was not captured"))?;

    let (written, output) = thread::scope(|scope| {
        let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
        let output = child.wait_with_output();
        (writer.join(), output)
    });

    match written {
        Ok(Ok(())) => {}
        // the child may legitimately exit without reading everything
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => {
            return Err(FandlError::EngineError {
                engine: engine.to_string(),
                message: format!("Failed to write input: {}", e),
                source: Some(Box::new(e)),
            });
        }
        Err(_) => return Err(FandlError::engine_error(engine, "stdin writer panicked")),
    }

    output.map_err(|e| FandlError::EngineError {
        engine: engine.to_string(),
        message: format!("Failed to collect output: {}", e),
        source: Some(Box::new(e)),
    })
}

/// Builds the error for an engine that exited unsuccessfully.
pub fn exit_error(engine: &str, output: &Output) -> FandlError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    FandlError::engine_error(
        engine,
        format!("exited with {}:\n{}", output.status, stderr.trim_end()),
    )
}
