//! Error types for playback management

use explayer_core::{ExError, TrackId};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Playlist is empty
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Track is not in the playlist
    #[error("Track not in playlist: {0}")]
    TrackNotFound(TrackId),

    /// Media output error
    #[error("Media output error: {0}")]
    MediaOutput(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Store or cache failure
    #[error(transparent)]
    Core(#[from] ExError),
}

impl PlaybackError {
    /// Whether this error came from the track store or session cache
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_storage_failure())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
