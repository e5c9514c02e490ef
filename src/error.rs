//! Error types for the EasyKey import CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (1=write, 2=path, 3=launch, 4=validation, 8=io)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers
//!
//! Every error is fatal to an import run. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Write (exit 1)
    WriteFailed,

    // Path (exit 2)
    PathNotFound,
    PathNotDirectory,
    PathUnreadable,

    // Launch (exit 3)
    WriterLaunchFailed,

    // Validation (exit 4)
    InvalidPrefix,
    InvalidArgument,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::WriteFailed => "WRITE_FAILED",
            Self::PathNotFound => "PATH_NOT_FOUND",
            Self::PathNotDirectory => "PATH_NOT_DIRECTORY",
            Self::PathUnreadable => "PATH_UNREADABLE",
            Self::WriterLaunchFailed => "WRITER_LAUNCH_FAILED",
            Self::InvalidPrefix => "INVALID_PREFIX",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::WriteFailed => 1,
            Self::PathNotFound | Self::PathNotDirectory | Self::PathUnreadable => 2,
            Self::WriterLaunchFailed => 3,
            Self::InvalidPrefix | Self::InvalidArgument => 4,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur during an import run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Directory not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    PathNotDirectory { path: PathBuf },

    #[error("Cannot traverse {}: {source}", path.display())]
    PathUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not launch writer {} for key {key}: {source}", program.display())]
    Invocation {
        program: PathBuf,
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Writer failed for key {key} ({}{}): {status}",
        path.display(),
        pid.map_or_else(String::new, |p| format!(", pid {p}"))
    )]
    WriteFailure {
        key: String,
        path: PathBuf,
        /// Child process id, when the writer was actually spawned.
        pid: Option<u32>,
        /// Human-readable exit status (`exit status: 1`, `signal: 9`, ...).
        status: String,
    },

    #[error("Invalid key prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::PathNotFound { .. } => ErrorCode::PathNotFound,
            Self::PathNotDirectory { .. } => ErrorCode::PathNotDirectory,
            Self::PathUnreadable { .. } => ErrorCode::PathUnreadable,
            Self::Invocation { .. } => ErrorCode::WriterLaunchFailed,
            Self::WriteFailure { .. } => ErrorCode::WriteFailed,
            Self::InvalidPrefix { .. } => ErrorCode::InvalidPrefix,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// True for the three path-error variants.
    #[must_use]
    pub const fn is_path_error(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. } | Self::PathNotDirectory { .. } | Self::PathUnreadable { .. }
        )
    }

    /// The key of the unit that failed, for invocation and write errors.
    #[must_use]
    pub fn failed_key(&self) -> Option<&str> {
        match self {
            Self::Invocation { key, .. } | Self::WriteFailure { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::PathNotFound { path } => Some(format!(
                "Check the spelling of '{}' or pass an absolute path.",
                path.display()
            )),
            Self::PathNotDirectory { .. } => {
                Some("`eki import` expects a directory, not a single file.".to_string())
            }
            Self::PathUnreadable { .. } => {
                Some("Check directory permissions for the current user.".to_string())
            }
            Self::Invocation { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => Some(
                    "Build the EasyKey write client or point to it with --writer / EASYKEY_WRITER."
                        .to_string(),
                ),
                std::io::ErrorKind::PermissionDenied => {
                    Some("Make the writer executable (chmod +x).".to_string())
                }
                _ => None,
            },
            Self::WriteFailure { .. } => Some(
                "Files imported before this one remain in the store. \
                 Re-run with a fresh prefix to import the tree again."
                    .to_string(),
            ),
            Self::InvalidPrefix { .. } => Some(
                "Keys may only contain letters, digits and '_'. Other characters are replaced with '_'."
                    .to_string(),
            ),
            Self::InvalidArgument(_) | Self::Io(_) | Self::Json(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, exit code, the failing unit's key when
    /// known, and an optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(key) = self.failed_key() {
            obj["error"]["key"] = serde_json::Value::String(key.to_string());
        }
        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
