/// Session snapshot mirrored in the fast cache
use crate::types::{PlaybackSnapshot, Track, TrackId};

/// Everything the session cache holds
///
/// The three parts are stored as independent entries, so any of them can be
/// missing on its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    /// Playlist records in playlist order (metadata only)
    pub playlist: Option<Vec<Track>>,

    /// Favorite track ids
    pub favorites: Option<Vec<TrackId>>,

    /// Transport state
    pub playback: Option<PlaybackSnapshot>,
}

impl SessionSnapshot {
    /// True when no entry was found
    pub fn is_empty(&self) -> bool {
        self.playlist.is_none() && self.favorites.is_none() && self.playback.is_none()
    }
}
