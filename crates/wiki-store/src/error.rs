//! Error types for wiki-store

use std::io::ErrorKind;
use std::path::PathBuf;

/// Result type for wiki-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the repository store.
///
/// Cache-level problems (unreadable or corrupt cache file, undecodable file
/// names) never show up here; they are logged and recovered internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path is neither indexed nor present on disk
    #[error("File not found in repository: {path}")]
    NotFound { path: String },

    /// The OS failed to read, write or delete the file
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The OS denied the operation
    #[error("Access to '{path}' was denied by the file system: {source}")]
    SecurityViolation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Parent folders for a new file could not be created
    #[error("Failed to create folder {folder} for '{path}': {source}")]
    CreateFolder {
        path: String,
        folder: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path is managed by the repository itself and cannot be written
    #[error("'{path}' is reserved by the repository")]
    ReservedPath { path: String },

    /// A shadow layer was requested but none is configured
    #[error("No shadow repository is configured")]
    ShadowUnavailable,

    /// The base root folder cannot be created or resolved
    #[error("Repository root {path} is not usable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem layer error from wiki-fs
    #[error(transparent)]
    Fs(#[from] wiki_fs::Error),
}

impl Error {
    /// Classify an OS error on a logical path.
    pub(crate) fn from_os(path: &str, source: std::io::Error) -> Self {
        let path = path.to_string();
        match source.kind() {
            ErrorKind::NotFound => Self::NotFound { path },
            ErrorKind::PermissionDenied => Self::SecurityViolation { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Classify a wiki-fs error raised while handling a logical path.
    pub(crate) fn from_fs(path: &str, error: wiki_fs::Error) -> Self {
        match error {
            wiki_fs::Error::CreateDir { path: folder, source } => Self::CreateFolder {
                path: path.to_string(),
                folder,
                source,
            },
            wiki_fs::Error::Io { source, .. } => Self::from_os(path, source),
            other => Self::Fs(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_security_violation(&self) -> bool {
        matches!(self, Self::SecurityViolation { .. })
    }
}
