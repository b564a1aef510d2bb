/// Track domain type
use crate::types::TrackId;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Artist assigned to imported files
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Imported audio track
///
/// The payload is the raw, still-encoded file content. It is not part of the
/// serialized form: cache records carry metadata only, the payload lives in
/// the track store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Encoded audio payload
    #[serde(skip)]
    pub data: Bytes,

    /// Duration in seconds, 0 until the media metadata has been read
    #[serde(default)]
    pub duration: f64,
}

impl Track {
    /// Create a new track with a fresh id and unknown duration
    pub fn new(title: impl Into<String>, artist: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::with_id(TrackId::generate(), title, artist, data)
    }

    /// Create a track with an explicit id
    pub fn with_id(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            data: data.into(),
            duration: 0.0,
        }
    }

    /// Create a track for an imported file
    ///
    /// The title is the file name without its extension, the artist is
    /// [`UNKNOWN_ARTIST`].
    pub fn from_file(file_name: &str, data: impl Into<Bytes>) -> Self {
        Self::new(title_from_file_name(file_name), UNKNOWN_ARTIST, data)
    }

    /// Get the track duration, `None` while unknown
    pub fn duration(&self) -> Option<Duration> {
        if self.duration.is_finite() && self.duration > 0.0 {
            Some(Duration::from_secs_f64(self.duration))
        } else {
            None
        }
    }

    /// Set the track duration
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration.as_secs_f64();
    }
}

/// Strip the last extension from a file name
///
/// Only a trailing `.ext` where `ext` is non-empty and contains neither `.`
/// nor `/` is removed, so `"a.tar.gz"` becomes `"a.tar"` and `"notes."` is kept.
pub fn title_from_file_name(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    }
}
