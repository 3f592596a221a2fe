//! Error types for inscribe.
//!
//! The metadata core distinguishes four failure kinds: the tool could not be
//! launched at all, the tool ran and exited nonzero, the tool succeeded but
//! printed something that is not JSON, and a comment could not be decoded.
//! The first three propagate to the caller; decode failures are logged and
//! swallowed by the decoder.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for inscribe operations.
#[derive(Error, Debug)]
pub enum InscribeError {
    /// The metadata tool could not be launched (missing binary, permission denied).
    #[error("Failed to spawn ExifTool process ({program}): {source}")]
    SpawnFailure {
        /// Program that was being launched.
        program: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata tool ran but exited with a nonzero status.
    #[error("ExifTool failed with code {}. Stderr: {stderr}", display_code(.code))]
    ToolExecution {
        /// Exit code, `None` if the process was terminated by a signal.
        code: Option<i32>,
        /// Captured standard error text.
        stderr: String,
    },

    /// The metadata tool exited successfully but its output was not valid JSON.
    #[error("Failed to parse ExifTool output: {message}")]
    ParseError {
        /// Human-readable error message.
        message: String,
        /// Underlying serde_json error, if available.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A comment could not be decoded with the selected text encoding.
    #[error("Could not decode comment as {encoding}: {message}")]
    DecodeError {
        /// Encoding that was attempted.
        encoding: &'static str,
        /// Human-readable error message.
        message: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// Permission denied when accessing a file or directory.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path where access was denied.
        path: PathBuf,
    },

    /// The value read back after a write differs from what was written.
    #[error("Saved comment could not be confirmed: wrote {expected:?}, read back {actual:?}")]
    VerificationFailed {
        /// Text that was written.
        expected: String,
        /// Text that was read back.
        actual: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration file contents.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

impl InscribeError {
    /// Create a spawn failure for `program`.
    #[must_use]
    pub fn spawn(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SpawnFailure {
            program: program.into(),
            source,
        }
    }

    /// Create a tool execution error from an exit code and raw stderr bytes.
    #[must_use]
    pub fn tool_execution(code: Option<i32>, stderr: &[u8]) -> Self {
        Self::ToolExecution {
            code,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    /// Create a new parse error with source.
    #[must_use]
    pub fn parse_with_source(source: serde_json::Error) -> Self {
        Self::ParseError {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a new decode error.
    #[must_use]
    pub fn decode(encoding: &'static str, message: impl Into<String>) -> Self {
        Self::DecodeError {
            encoding,
            message: message.into(),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Map an I/O error on `path` to the most specific variant.
    #[must_use]
    pub fn from_io_at(path: impl Into<PathBuf>, source: std::io::Error, is_dir: bool) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound if is_dir => Self::DirectoryNotFound { path },
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::io(format!("Failed to access {}", path.display()), source),
        }
    }

    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Exit code of the failed tool process, if this is a tool execution error.
    #[must_use]
    pub const fn tool_exit_code(&self) -> Option<i32> {
        match self {
            Self::ToolExecution { code, .. } => *code,
            _ => None,
        }
    }

    /// Get the process exit code the CLI should use for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ParseError { .. } => exit_codes::EXIT_PARSE_ERROR,
            Self::FileNotFound { .. } | Self::DirectoryNotFound { .. } => {
                exit_codes::EXIT_FILE_NOT_FOUND
            }
            Self::PermissionDenied { .. } => exit_codes::EXIT_PERMISSION_DENIED,
            Self::ConfigError { .. } | Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::ToolExecution { .. } => exit_codes::EXIT_TOOL_ERROR,
            Self::SpawnFailure { .. } => exit_codes::EXIT_SPAWN_ERROR,
            Self::VerificationFailed { .. } => exit_codes::EXIT_VERIFICATION_FAILED,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }
}

/// Result type alias for inscribe operations.
pub type Result<T> = std::result::Result<T, InscribeError>;

impl From<std::io::Error> for InscribeError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for InscribeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

impl From<dialoguer::Error> for InscribeError {
    fn from(err: dialoguer::Error) -> Self {
        Self::io(
            "Interactive prompt failed",
            std::io::Error::new(std::io::ErrorKind::Other, err),
        )
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Metadata tool output could not be parsed.
    pub const EXIT_PARSE_ERROR: i32 = 2;
    /// Specified file or directory not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Insufficient permissions.
    pub const EXIT_PERMISSION_DENIED: i32 = 4;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Metadata tool exited nonzero.
    pub const EXIT_TOOL_ERROR: i32 = 6;
    /// Metadata tool could not be launched.
    pub const EXIT_SPAWN_ERROR: i32 = 7;
    /// Written comment did not read back identically.
    pub const EXIT_VERIFICATION_FAILED: i32 = 8;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(InscribeError::parse_with_source(bad_json).exit_code(), 2);

        let not_found = InscribeError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        assert_eq!(InscribeError::tool_execution(Some(1), b"").exit_code(), 6);
        assert_eq!(InscribeError::spawn("/x", std::io::ErrorKind::NotFound.into()).exit_code(), 7);
        assert_eq!(
            InscribeError::ConfigError { message: "no home".into() }.exit_code(),
            5
        );
    }

    #[test]
    fn test_tool_execution_message_carries_code_and_stderr() {
        let err = InscribeError::tool_execution(Some(1), b"Error: File not found - a.jpg\n");
        assert_eq!(
            err.to_string(),
            "ExifTool failed with code 1. Stderr: Error: File not found - a.jpg"
        );
        assert_eq!(err.tool_exit_code(), Some(1));
    }

    #[test]
    fn test_tool_execution_without_code() {
        let err = InscribeError::tool_execution(None, b"");
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.tool_exit_code(), None);
    }

    #[test]
    fn test_from_io_at_picks_variant() {
        let nf = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            InscribeError::from_io_at("/x", nf, true),
            InscribeError::DirectoryNotFound { .. }
        ));

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            InscribeError::from_io_at("/x", denied, false),
            InscribeError::PermissionDenied { .. }
        ));
    }
}
