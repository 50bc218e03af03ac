//! Error types for wiki-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from wiki-store
    #[error(transparent)]
    Store(#[from] wiki_store::Error),

    /// Error from wiki-fs
    #[error(transparent)]
    Fs(#[from] wiki_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid --match pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp '{value}', expected e.g. 2020-01-20T21:39:58.804Z")]
    InvalidTimestamp { value: String },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
