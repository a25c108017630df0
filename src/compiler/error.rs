//! Compiler error types.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Errors produced while compiling a style source.
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
    /// The compiler executable could not be found.
    #[error("Sass binary not found: {binary}")]
    CompilerNotFound { binary: String },

    /// Permission denied when spawning the compiler.
    #[error("Permission denied running {binary}")]
    PermissionDenied { binary: String },

    /// The compiler rejected the source.
    #[error("{message}")]
    Failed {
        message: String,
        /// Full diagnostic output, when the compiler gave one.
        trace: Option<String>,
    },

    /// The compiler ran past the configured limit and was killed.
    #[error("Compilation timed out after {after:?}")]
    Timeout { after: Duration },

    /// The compiler reported success but left no output behind.
    #[error("Compiler output missing at {path}: {source}")]
    MissingOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Classify an error raised while spawning `binary`.
    pub(crate) fn from_spawn(binary: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::CompilerNotFound {
                binary: binary.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                binary: binary.to_string(),
            },
            _ => Self::Io(err),
        }
    }

    /// Build a `Failed` error from the compiler's stderr.
    ///
    /// The first non-empty line becomes the message; the whole output is kept
    /// as the trace.
    pub(crate) fn from_stderr(stderr: &[u8], status: ExitStatus) -> Self {
        let text = String::from_utf8_lossy(stderr);
        let trimmed = text.trim();
        let message = trimmed
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| line.strip_prefix("Error: ").unwrap_or(line).to_string())
            .unwrap_or_else(|| format!("Compiler exited with {status}"));
        let trace = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Self::Failed { message, trace }
    }

    /// Diagnostic trace attached to the error, if any.
    #[must_use]
    pub fn trace(&self) -> Option<&str> {
        match self {
            Self::Failed { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }
}

/// Error writing a compiled file to disk.
#[derive(thiserror::Error, Debug)]
#[error("Failed to write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    pub source: std::io::Error,
}
