/// Core error types for ExPlayer
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `ExError`
pub type Result<T> = std::result::Result<T, ExError>;

/// Core error type for ExPlayer
#[derive(Error, Debug)]
pub enum ExError {
    /// Durable or cache storage failed (open, read, write, delete)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl ExError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from a storage backend
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ExError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
