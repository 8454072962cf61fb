//! Error types for extraction and package listing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing an SDK tree.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scan root exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Entry name is not valid UTF-8 and cannot form a package name.
    #[error("Name is not valid UTF-8: {path:?}")]
    InvalidName { path: PathBuf },

    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Package config could not be serialized.
    #[error("Failed to write JSON to {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// Settings file could not be parsed.
    #[error("Invalid settings in {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl SdkError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
