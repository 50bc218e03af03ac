//! Error types for wiki-fs

use std::path::PathBuf;

/// Result type for wiki-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wiki-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path {path} is outside of repository root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Invalid escape sequence in '{path}' at offset {offset}")]
    InvalidEscape { path: String, offset: usize },

    #[error("Unpaired UTF-16 surrogate in '{path}' at offset {offset}")]
    UnpairedSurrogate { path: String, offset: usize },

    #[error("File name is not valid UTF-8: {path}")]
    NonUtf8Name { path: PathBuf },

    #[error("File name {path} does not match the escaped form of '{logical}'")]
    NonCanonical { path: PathBuf, logical: String },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config at {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying OS error, if this error came from the filesystem.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            Self::Io { source, .. } | Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether this is a failure to decode a physical path into a logical one.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::OutsideRoot { .. }
                | Self::InvalidEscape { .. }
                | Self::UnpairedSurrogate { .. }
                | Self::NonUtf8Name { .. }
                | Self::NonCanonical { .. }
        )
    }
}
