/// Playback state types persisted between sessions
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track
    #[default]
    #[serde(rename = "none")]
    Off,
    /// Loop the current track
    One,
    /// Loop the whole playlist
    All,
}

impl RepeatMode {
    /// Next mode in the none → one → all → none cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "none",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

impl FromStr for RepeatMode {
    type Err = crate::ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "off" => Ok(Self::Off),
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            other => Err(crate::ExError::invalid_input(format!(
                "unknown repeat mode: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Last known transport state, as mirrored in the session cache
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Seconds elapsed in the current track
    #[serde(default)]
    pub current_time: f64,

    /// Whether playback was running
    #[serde(default)]
    pub is_playing: bool,

    /// Index into the playlist, `None` when the playlist is empty
    #[serde(default)]
    pub current_track_index: Option<usize>,

    /// Whether shuffle was enabled
    #[serde(default)]
    pub is_shuffled: bool,

    /// Repeat mode
    #[serde(default)]
    pub repeat_mode: RepeatMode,
}
