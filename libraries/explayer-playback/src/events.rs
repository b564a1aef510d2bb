//! Player events
//!
//! Events queue up inside the [`Player`](crate::Player) and are drained by the
//! UI after each handled action. They carry everything needed to refresh the
//! affordances (play button, progress bar, time labels, lists) without reading
//! player state back.

use crate::types::PlaybackStatus;
use explayer_core::{RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Transport state changed (play/pause affordance)
    StatusChanged {
        status: PlaybackStatus,
    },

    /// A track was loaded into the media output
    TrackChanged {
        track_id: TrackId,
        index: usize,
        title: String,
        artist: String,
    },

    /// Progress update
    PositionChanged {
        /// Seconds elapsed
        position: f64,
        /// Track length in seconds, `None` while unknown
        duration: Option<f64>,
        /// `position` as `m:ss`
        elapsed_label: String,
        /// `duration` as `m:ss` ("0:00" while unknown)
        duration_label: String,
    },

    /// Media metadata resolved the track length
    DurationResolved {
        track_id: TrackId,
        duration: f64,
    },

    /// The current track reached its natural end
    TrackEnded {
        track_id: TrackId,
    },

    /// Tracks were added or removed
    PlaylistChanged {
        length: usize,
    },

    /// Favorites membership changed
    FavoritesChanged {
        count: usize,
    },

    ShuffleChanged {
        enabled: bool,
    },

    RepeatChanged {
        mode: RepeatMode,
    },

    VolumeChanged {
        /// Volume level (0-100)
        level: u8,
        is_muted: bool,
    },

    /// An action failed; the session continues
    Error {
        message: String,
    },
}
