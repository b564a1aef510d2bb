//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No track loaded
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Loaded and paused
    Paused,
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0-100, default: 100)
    pub volume: u8,

    /// Minimum media-time distance between two position saves (default: 5s)
    pub position_save_interval: Duration,

    /// Resume playback on restore when the last session was playing (default: true)
    pub restore_playback: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 100,
            position_save_interval: Duration::from_secs(5),
            restore_playback: true,
        }
    }
}
