//! Error taxonomy for the installer engine.
//!
//! Every failure the engine can raise carries a human-readable message and,
//! where the user can do something about it, a one-line suggestion. Only the
//! command boundary in `main` turns these into an exit status.
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Coarse classification used when printing and when callers branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Registry,
    Network,
    Validation,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "ConfigError",
            Self::Registry => "RegistryError",
            Self::Network => "NetworkError",
            Self::Validation => "ValidationError",
            Self::Io => "IoError",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum PdfxError {
    /// Missing or invalid `pdfx.json`.
    #[error("{message}")]
    Config {
        message: String,
        suggestion: Option<String>,
    },

    /// The registry answered, but with something we cannot use.
    #[error("{message}")]
    Registry {
        message: String,
        suggestion: Option<String>,
    },

    /// The registry could not be reached at all.
    #[error("{message}")]
    Network {
        message: String,
        suggestion: Option<String>,
    },

    /// Path escapes and malformed component names.
    #[error("{message}")]
    Validation {
        message: String,
        suggestion: Option<String>,
    },

    /// Filesystem failure while probing or writing.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PdfxError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Build an I/O error whose context names the path involved.
    pub fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("{action} {}", path.display()), source)
    }

    /// Attach a remediation hint. I/O errors carry none and are returned as-is.
    pub fn with_suggestion(mut self, hint: impl Into<String>) -> Self {
        match &mut self {
            Self::Config { suggestion, .. }
            | Self::Registry { suggestion, .. }
            | Self::Network { suggestion, .. }
            | Self::Validation { suggestion, .. } => *suggestion = Some(hint.into()),
            Self::Io { .. } => {}
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Registry { .. } => ErrorKind::Registry,
            Self::Network { .. } => ErrorKind::Network,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Config { suggestion, .. }
            | Self::Registry { suggestion, .. }
            | Self::Network { suggestion, .. }
            | Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfxError>;
