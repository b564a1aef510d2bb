//! Transport controller
//!
//! Owns the media output and the transport state: play/pause status, the
//! position in the loaded track, shuffle, repeat and volume. It also answers
//! the advance-policy questions (which index is next, what happens at the end
//! of a track) without touching the playlist itself.

use crate::error::{PlaybackError, Result};
use crate::output::MediaOutput;
use crate::shuffle;
use crate::types::PlaybackStatus;
use crate::volume::Volume;
use explayer_core::{RepeatMode, Track, TrackId};
use std::time::Duration;

/// What to do when the current track ends on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTrack {
    /// Play the same track again from the start
    Restart,
    /// Move on as if next was pressed
    Advance,
    /// Stop without wrapping
    Stop,
}

/// Transport state machine over a media output
pub struct Transport {
    output: Box<dyn MediaOutput>,
    status: PlaybackStatus,
    position: f64,
    shuffled: bool,
    repeat: RepeatMode,
    volume: Volume,
}

impl Transport {
    pub fn new(mut output: Box<dyn MediaOutput>, volume: Volume) -> Self {
        output.set_volume(volume.gain());
        Self {
            output,
            status: PlaybackStatus::Stopped,
            position: 0.0,
            shuffled: false,
            repeat: RepeatMode::Off,
            volume,
        }
    }

    // ===== State =====

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Id of the track held by the output
    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.output.loaded()
    }

    /// Seconds elapsed in the current track
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Overwrite the position without seeking the output
    ///
    /// Used for position reports coming from the output, and for the saved
    /// position of a track that is not loaded yet.
    pub fn set_position(&mut self, seconds: f64) {
        self.position = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    }

    /// Length of the loaded track, `None` while unknown
    pub fn duration(&self) -> Option<Duration> {
        self.output.duration().filter(|d| !d.is_zero())
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn set_shuffled(&mut self, shuffled: bool) {
        self.shuffled = shuffled;
    }

    /// Flip shuffle, returning the new setting
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffled = !self.shuffled;
        self.shuffled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Cycle none → one → all → none, returning the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.next();
        self.repeat
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Set volume level (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.output.set_volume(self.volume.gain());
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.output.set_volume(self.volume.gain());
    }

    // ===== Control =====

    /// Load a track, releasing the previous handle
    ///
    /// Playback starts at `start_at` seconds, clamped to the track length
    /// when known. The transport is paused afterwards.
    pub fn load(&mut self, track: &Track, start_at: f64) -> Result<()> {
        self.output.load(track)?;
        self.output.set_volume(self.volume.gain());

        let mut start = if start_at.is_finite() { start_at.max(0.0) } else { 0.0 };
        if let Some(duration) = self.duration() {
            start = start.min(duration.as_secs_f64());
        }
        if start > 0.0 {
            self.output.seek(Duration::from_secs_f64(start))?;
        }

        self.position = start;
        self.status = PlaybackStatus::Paused;
        Ok(())
    }

    /// Start or resume the loaded track
    pub fn play(&mut self) -> Result<()> {
        if self.output.loaded().is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.output.play()?;
        self.status = PlaybackStatus::Playing;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.output.pause();
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Rewind the loaded track and keep playing
    pub fn restart(&mut self) -> Result<()> {
        self.output.seek(Duration::ZERO)?;
        self.position = 0.0;
        self.play()
    }

    /// Release the handle and return to the stopped state at position 0
    pub fn stop(&mut self) {
        self.output.unload();
        self.position = 0.0;
        self.status = PlaybackStatus::Stopped;
    }

    /// Seek to `fraction` of the loaded track
    ///
    /// Returns the new position, or `None` (and does nothing) while the
    /// length is unknown. `fraction` is clamped to `[0, 1]`.
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<Option<f64>> {
        if !fraction.is_finite() {
            return Err(PlaybackError::InvalidOperation(format!(
                "seek fraction must be finite, got {fraction}"
            )));
        }
        let Some(duration) = self.duration() else {
            return Ok(None);
        };

        let target = duration.as_secs_f64() * fraction.clamp(0.0, 1.0);
        self.output.seek(Duration::from_secs_f64(target))?;
        self.position = target;
        Ok(Some(target))
    }

    /// Move the output clock forward and pick up its position
    ///
    /// Returns `true` when the loaded track reached its end.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        self.output.advance(elapsed);
        self.position = self.output.position().as_secs_f64();
        self.output.is_finished()
    }

    // ===== Advance policy =====

    /// Index to play after `current` in a playlist of `len` tracks
    pub fn next_index(&self, current: Option<usize>, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if self.shuffled {
            return shuffle::pick_index(len);
        }
        Some(current.map_or(0, |i| (i + 1) % len))
    }

    /// Index to play before `current` in a playlist of `len` tracks
    pub fn previous_index(&self, current: Option<usize>, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if self.shuffled {
            return shuffle::pick_index(len);
        }
        Some(current.map_or(0, |i| (i % len + len - 1) % len))
    }

    /// Decide what happens when the track at `current` ends
    pub fn end_of_track(&self, current: usize, len: usize) -> EndOfTrack {
        match self.repeat {
            RepeatMode::One => EndOfTrack::Restart,
            RepeatMode::All => EndOfTrack::Advance,
            RepeatMode::Off if current + 1 < len => EndOfTrack::Advance,
            RepeatMode::Off => EndOfTrack::Stop,
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("status", &self.status)
            .field("loaded", &self.output.loaded())
            .field("position", &self.position)
            .field("shuffled", &self.shuffled)
            .field("repeat", &self.repeat)
            .field("volume", &self.volume)
            .finish()
    }
}
