//! Error types for fandl.
//!
//! This module defines the error type shared by the library and the CLI. The
//! variants follow the failure classes of a format-and-lint run: invalid or
//! missing arguments, unrepresentable ignore configuration, I/O failures,
//! unparsable configuration files and failures of the external engines.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// The main error type for fandl operations.
///
/// Every fatal condition maps onto one variant, so callers can tell
/// pre-flight validation failures apart from I/O and engine failures.
#[derive(Debug)]
pub enum FandlError {
    /// The caller supplied mutually exclusive or semantically invalid options.
    ArgumentInvalid {
        /// Description of the problem.
        message: String,
        /// Optional remediation hint shown to the user.
        hint: Option<String>,
    },

    /// A required input is absent.
    ArgumentMissing {
        /// The name of the missing argument.
        argument: String,
        /// Description of what was expected.
        message: String,
    },

    /// Input configuration cannot be represented (e.g. negated ignore patterns).
    ConfigurationConflict {
        /// Description of the conflict.
        message: String,
        /// Optional remediation hint shown to the user.
        hint: Option<String>,
    },

    /// An error occurred during file system operations.
    IoError {
        /// The operation being performed.
        operation: String,
        /// The path involved in the error.
        path: Option<PathBuf>,
        /// The underlying IO error.
        source: Option<io::Error>,
    },

    /// An error occurred while loading or parsing a configuration or manifest file.
    ConfigError {
        /// Description of the configuration issue.
        message: String,
        /// The config file path, if applicable.
        path: Option<PathBuf>,
        /// The underlying error.
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The formatter or linter failed or produced unusable output.
    EngineError {
        /// The engine that failed (e.g. `prettier`, `eslint`).
        engine: String,
        /// Description of what went wrong.
        message: String,
        /// The underlying error.
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FandlError {
    /// Creates a new `ArgumentInvalid` error.
    ///
    /// # Arguments
    /// * `message` - A description of the invalid input.
    ///
    /// # Examples
    /// ```
    /// use fandl_core::error::FandlError;
    ///
    /// let err = FandlError::argument_invalid("Both configs were given.");
    /// assert_eq!(err.name(), "ArgumentInvalid");
    /// ```
    pub fn argument_invalid(message: impl Into<String>) -> Self {
        Self::ArgumentInvalid {
            message: message.into(),
            hint: None,
        }
    }

    /// Creates a new `ArgumentInvalid` error with a remediation hint.
    ///
    /// # Arguments
    /// * `message` - A description of the invalid input.
    /// * `hint` - What the user can do about it.
    pub fn argument_invalid_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ArgumentInvalid {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Creates a new `ArgumentMissing` error.
    ///
    /// # Arguments
    /// * `argument` - The name of the missing argument.
    /// * `message` - A description of what was expected.
    pub fn argument_missing(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArgumentMissing {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigurationConflict` error with a remediation hint.
    ///
    /// # Arguments
    /// * `message` - A description of the conflict.
    /// * `hint` - What the user can do about it.
    pub fn configuration_conflict(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ConfigurationConflict {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Creates a new `IoError` with a path and underlying error.
    ///
    /// # Arguments
    /// * `operation` - A description of the IO operation being performed.
    /// * `path` - The path involved in the error.
    /// * `source` - The underlying IO error.
    pub fn io_error_with_source(
        operation: impl Into<String>,
        path: PathBuf,
        source: io::Error,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            path: Some(path),
            source: Some(source),
        }
    }

    /// Creates a new `ConfigError` with a file path.
    ///
    /// # Arguments
    /// * `message` - A description of the configuration issue.
    /// * `path` - The path to the config file.
    pub fn config_error_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::ConfigError {
            message: message.into(),
            path: Some(path),
            source: None,
        }
    }

    /// Creates a new `EngineError` for the given engine.
    ///
    /// # Arguments
    /// * `engine` - The name of the engine that failed.
    /// * `message` - A description of what went wrong.
    pub fn engine_error(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EngineError {
            engine: engine.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a path to `IoError` and `ConfigError` values that lack one.
    ///
    /// Conversions through `?` lose the file being processed; this puts it back.
    #[must_use]
    pub fn with_path(self, new_path: impl Into<PathBuf>) -> Self {
        match self {
            Self::IoError {
                operation,
                path: None,
                source,
            } => Self::IoError {
                operation,
                path: Some(new_path.into()),
                source,
            },
            Self::ConfigError {
                message,
                path: None,
                source,
            } => Self::ConfigError {
                message,
                path: Some(new_path.into()),
                source,
            },
            other => other,
        }
    }

    /// Returns the name of the error variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArgumentInvalid { .. } => "ArgumentInvalid",
            Self::ArgumentMissing { .. } => "ArgumentMissing",
            Self::ConfigurationConflict { .. } => "ConfigurationConflict",
            Self::IoError { .. } => "IoError",
            Self::ConfigError { .. } => "ConfigError",
            Self::EngineError { .. } => "EngineError",
        }
    }

    /// Returns the remediation hint attached to the error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::ArgumentInvalid { hint, .. } | Self::ConfigurationConflict { hint, .. } => {
                hint.as_deref()
            }
            _ => None,
        }
    }

    /// Returns suggested recovery actions for the error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ArgumentInvalid { hint, .. } => {
                let mut s = Vec::new();
                if let Some(hint) = hint {
                    s.push(hint.clone());
                }
                s.push("Review the command-line arguments".to_string());
                s
            }
            Self::ArgumentMissing { argument, .. } => vec![
                format!("Provide a value for '{}'", argument),
                "Check that the selection patterns match at least one file".to_string(),
            ],
            Self::ConfigurationConflict { hint, .. } => hint.iter().cloned().collect(),
            Self::IoError { operation, .. } => {
                let mut s = vec![
                    "Check that the path exists and is accessible".to_string(),
                    "Verify you have the necessary permissions".to_string(),
                ];
                if operation.contains("write") {
                    s.push("Ensure the output directory is writable".to_string());
                }
                s
            }
            Self::ConfigError { .. } => vec![
                "Check the configuration file syntax".to_string(),
                "Ensure the file extension matches its format (.json, .yaml, .toml)".to_string(),
            ],
            Self::EngineError { engine, .. } => vec![
                format!("Ensure '{}' is installed in the project's node_modules", engine),
                "Run the engine directly to see its full output".to_string(),
            ],
        }
    }
}

impl fmt::Display for FandlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgumentInvalid { message, .. } => write!(f, "{}", message),
            Self::ArgumentMissing { argument, message } => {
                write!(f, "Missing argument '{}': {}", argument, message)
            }
            Self::ConfigurationConflict { message, .. } => write!(f, "{}", message),
            Self::IoError {
                operation,
                path,
                source,
            } => {
                match path {
                    Some(p) => write!(f, "IO error during '{}' at '{}'", operation, p.display())?,
                    None => write!(f, "IO error during '{}'", operation)?,
                }
                if let Some(source) = source {
                    write!(f, ": {}", source)?;
                }
                Ok(())
            }
            Self::ConfigError { message, path, .. } => {
                if let Some(p) = path {
                    write!(f, "Configuration error in '{}': {}", p.display(), message)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            Self::EngineError {
                engine, message, ..
            } => write!(f, "Engine '{}' failed: {}", engine, message),
        }
    }
}

impl std::error::Error for FandlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => source.as_ref().map(|e| e as _),
            Self::ConfigError { source, .. } => source.as_ref().map(|s| s.as_ref() as _),
            Self::EngineError { source, .. } => source.as_ref().map(|s| s.as_ref() as _),
            Self::ArgumentInvalid { .. }
            | Self::ArgumentMissing { .. }
            | Self::ConfigurationConflict { .. } => None,
        }
    }
}

// Implement From conversions for common error types

impl From<io::Error> for FandlError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            operation: "file operation".to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<toml::de::Error> for FandlError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML: {}", err),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for FandlError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse/serialize JSON: {}", err),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for FandlError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse YAML: {}", err),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<globset::Error> for FandlError {
    fn from(err: globset::Error) -> Self {
        Self::ArgumentInvalid {
            message: format!("Invalid file pattern: {}", err),
            hint: None,
        }
    }
}

impl From<walkdir::Error> for FandlError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from);
        Self::IoError {
            operation: "directory traversal".to_string(),
            path,
            source: err.into_io_error(),
        }
    }
}

/// A type alias for `Result<T, FandlError>`.
///
/// This is the recommended return type for functions that can fail with fandl-specific errors.
pub type Result<T> = std::result::Result<T, FandlError>;
