//! Media output seam
//!
//! A [`MediaOutput`] plays one track at a time from its in-memory payload.
//! Loading a track releases whatever handle was loaded before.
//!
//! [`HeadlessOutput`] has no audio device. Its clock is driven by the caller
//! through [`MediaOutput::advance`], which makes the transport logic testable
//! and lets command-line sessions keep position bookkeeping.

use crate::error::{PlaybackError, Result};
use explayer_core::{Track, TrackId};
use lofty::{AudioFile, Probe};
use std::io::Cursor;
use std::time::Duration;

/// Platform media output
pub trait MediaOutput: Send {
    /// Load a track, releasing any previously loaded one
    fn load(&mut self, track: &Track) -> Result<()>;

    /// Start or resume playback of the loaded track
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Seek within the loaded track
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playback position
    fn position(&self) -> Duration;

    /// Length of the loaded track, `None` until known
    fn duration(&self) -> Option<Duration>;

    /// Set linear output gain (0.0-1.0)
    fn set_volume(&mut self, gain: f32);

    /// Release the loaded track
    fn unload(&mut self);

    /// Id of the loaded track
    fn loaded(&self) -> Option<&TrackId>;

    /// Whether the loaded track has played to its end
    fn is_finished(&self) -> bool;

    /// Advance a caller-driven clock
    ///
    /// Outputs with their own clock ignore this.
    fn advance(&mut self, _elapsed: Duration) {}
}

/// Read the playable length of an encoded payload
///
/// Returns `None` when the format is not recognised or reports no length.
pub fn probe_duration(data: &[u8]) -> Option<Duration> {
    let probe = match Probe::new(Cursor::new(data)).guess_file_type() {
        Ok(probe) => probe,
        Err(e) => {
            tracing::debug!(error = %e, "Payload probe failed");
            return None;
        }
    };

    match probe.read() {
        Ok(tagged_file) => {
            let duration = tagged_file.properties().duration();
            (duration > Duration::ZERO).then_some(duration)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Payload not readable as audio");
            None
        }
    }
}

#[derive(Debug)]
struct LoadedMedia {
    track_id: TrackId,
    duration: Option<Duration>,
    position: Duration,
}

/// Media output without an audio device
#[derive(Debug)]
pub struct HeadlessOutput {
    loaded: Option<LoadedMedia>,
    playing: bool,
    gain: f32,
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self {
            loaded: None,
            playing: false,
            gain: 1.0,
        }
    }

    /// Whether the clock is running
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last gain set
    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for HeadlessOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaOutput for HeadlessOutput {
    fn load(&mut self, track: &Track) -> Result<()> {
        self.unload();

        let duration = track.duration().or_else(|| probe_duration(&track.data));
        tracing::debug!(track_id = %track.id, ?duration, "Loaded track");

        self.loaded = Some(LoadedMedia {
            track_id: track.id.clone(),
            duration,
            position: Duration::ZERO,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let media = self.loaded.as_mut().ok_or(PlaybackError::NoTrackLoaded)?;
        media.position = match media.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        Ok(())
    }

    fn position(&self) -> Duration {
        self.loaded.as_ref().map_or(Duration::ZERO, |m| m.position)
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.as_ref().and_then(|m| m.duration)
    }

    fn set_volume(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.playing = false;
    }

    fn loaded(&self) -> Option<&TrackId> {
        self.loaded.as_ref().map(|m| &m.track_id)
    }

    fn is_finished(&self) -> bool {
        self.loaded
            .as_ref()
            .and_then(|m| m.duration.map(|d| m.position >= d))
            .unwrap_or(false)
    }

    fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        if let Some(media) = self.loaded.as_mut() {
            media.position += elapsed;
            if let Some(duration) = media.duration {
                if media.position >= duration {
                    media.position = duration;
                    self.playing = false;
                }
            }
        }
    }
}
