//! Error types for headstamp.

use std::path::PathBuf;

use thiserror::Error;

/// Crate error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A git command ran but exited unsuccessfully.
    #[error("git {command} failed: {message}")]
    Backend { command: String, message: String },

    /// The git executable could not be spawned at all.
    #[error("git is unavailable: {0}")]
    BackendUnavailable(#[source] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    FileUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No comment delimiters for file type: {0}")]
    UnknownFileType(String),

    #[error("Re-commit failed: {0}")]
    Recommit(String),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error came from the git backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend { .. } | Error::BackendUnavailable(_))
    }
}
