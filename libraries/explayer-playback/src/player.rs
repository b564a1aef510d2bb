//! Player
//!
//! Coordinates the playlist model, the transport, the durable track store and
//! the session cache so they never drift apart:
//!
//! - track additions and removals reach the track store first; the in-memory
//!   change only happens once the store acknowledged it
//! - every change to playlist, favorites or transport state is mirrored to the
//!   session cache right after it is applied
//! - on startup the playlist comes from the track store and the last transport
//!   state and favorites are overlaid from the cache

use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::import::{ImportFailure, ImportFile, ImportSummary};
use crate::output::MediaOutput;
use crate::playlist::PlaylistModel;
use crate::transport::{EndOfTrack, Transport};
use crate::types::{PlaybackStatus, PlayerConfig};
use crate::volume::Volume;
use bytes::Bytes;
use explayer_core::{format_time, PlaybackSnapshot, RepeatMode, Track, TrackId, TrackStore};
use explayer_storage::SessionCache;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The application-state object handed to every UI handler
pub struct Player {
    store: Arc<dyn TrackStore>,
    cache: SessionCache,
    playlist: PlaylistModel,
    transport: Transport,
    config: PlayerConfig,

    // Last snapshot written to the cache, consulted when a track is loaded
    saved: Option<PlaybackSnapshot>,

    // Position at the last save, for throttling position ticks
    last_position_save: f64,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl Player {
    /// Create a player with an empty playlist
    ///
    /// Call [`restore`](Self::restore) to load the previous session.
    pub fn new(
        store: Arc<dyn TrackStore>,
        cache: SessionCache,
        output: Box<dyn MediaOutput>,
        config: PlayerConfig,
    ) -> Self {
        let transport = Transport::new(output, Volume::new(config.volume));
        Self {
            store,
            cache,
            playlist: PlaylistModel::new(),
            transport,
            config,
            saved: None,
            last_position_save: 0.0,
            pending_events: Vec::new(),
        }
    }

    // ===== Session =====

    /// Rebuild the session from the track store and the session cache
    ///
    /// Tracks are ordered as the cached playlist listed them (tracks the cache
    /// does not know follow in store order). Favorites naming missing tracks
    /// are dropped and an out-of-range index is clamped. If the last session
    /// was playing, the current track starts again at its saved position.
    ///
    /// # Errors
    /// Fails only if the track store cannot be read; the player is left
    /// unchanged in that case.
    pub async fn restore(&mut self) -> Result<()> {
        let stored = match self.store.get_all().await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read track store");
                return Err(e.into());
            }
        };

        let snapshot = self.cache.load().unwrap_or_default();
        let tracks = order_by_cache(stored, snapshot.playlist.as_deref());
        let playback = snapshot.playback.clone().unwrap_or_default();

        self.transport.stop();
        self.playlist = PlaylistModel::from_parts(
            tracks,
            snapshot.favorites.unwrap_or_default(),
            playback.current_track_index,
        );
        self.transport.set_shuffled(playback.is_shuffled);
        self.transport.set_repeat_mode(playback.repeat_mode);
        self.transport.set_position(playback.current_time);
        self.saved = snapshot.playback;

        tracing::info!(
            tracks = self.playlist.len(),
            favorites = self.playlist.favorite_count(),
            index = ?self.playlist.current_index(),
            "Session restored"
        );

        self.emit(PlayerEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.emit(PlayerEvent::FavoritesChanged {
            count: self.playlist.favorite_count(),
        });
        self.emit(PlayerEvent::ShuffleChanged {
            enabled: playback.is_shuffled,
        });
        self.emit(PlayerEvent::RepeatChanged {
            mode: playback.repeat_mode,
        });

        if playback.is_playing && self.config.restore_playback {
            if let Some(index) = self.playlist.current_index() {
                if let Err(e) = self.load_and_play(index).await {
                    tracing::warn!(index, error = %e, "Could not resume playback");
                    self.emit_error(&e);
                }
            }
        }

        self.save();
        Ok(())
    }

    /// Forget the cached session state
    ///
    /// Favorites, shuffle, repeat and the position are reset and playback
    /// stops. Tracks stay in the store and the playlist.
    pub fn reset_session(&mut self) {
        self.transport.stop();
        self.transport.set_shuffled(false);
        self.transport.set_repeat_mode(RepeatMode::Off);

        let tracks = self.playlist.tracks().to_vec();
        self.playlist = PlaylistModel::from_parts(tracks, std::iter::empty(), Some(0));

        self.cache.clear();
        self.saved = None;
        tracing::info!("Session reset");

        self.emit_status();
        self.emit(PlayerEvent::FavoritesChanged { count: 0 });
        self.save();
    }

    // ===== Library =====

    /// Import one file as a new track
    ///
    /// The title is the file name without extension and the artist is
    /// "Unknown". The track joins the playlist only once the track store has
    /// stored it.
    pub async fn import(&mut self, file_name: &str, data: impl Into<Bytes>) -> Result<TrackId> {
        let track = Track::from_file(file_name, data);

        if let Err(e) = self.store.put(&track).await {
            tracing::error!(file = file_name, error = %e, "Import failed, track not added");
            return Err(e.into());
        }

        let id = track.id.clone();
        let index = self.playlist.add(track);
        tracing::info!(track_id = %id, index, file = file_name, "Imported track");

        self.emit(PlayerEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.save();
        Ok(id)
    }

    /// Import a batch of files
    ///
    /// Non-audio entries are skipped. A failed entry does not stop the batch.
    pub async fn import_files(&mut self, files: impl IntoIterator<Item = ImportFile>) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for file in files {
            if !file.is_audio() {
                tracing::debug!(file = %file.name, media_type = %file.media_type, "Skipping non-audio file");
                summary.skipped_non_audio += 1;
                continue;
            }

            let result = self.import(&file.name, file.data).await;
            match result {
                Ok(id) => summary.imported.push(id),
                Err(e) => summary.failed.push(ImportFailure {
                    name: file.name,
                    message: e.to_string(),
                }),
            }
        }

        if summary.skipped_non_audio > 0 || !summary.failed.is_empty() {
            tracing::info!(
                imported = summary.imported.len(),
                skipped = summary.skipped_non_audio,
                failed = summary.failed.len(),
                "Import batch finished"
            );
        }
        summary
    }

    /// Remove a track from the store, the playlist and the favorites
    ///
    /// Returns `Ok(false)` if the track is not in the playlist. Removing the
    /// loaded track stops playback.
    pub async fn remove(&mut self, id: &TrackId) -> Result<bool> {
        if !self.playlist.contains(id) {
            tracing::debug!(track_id = %id, "Remove of unknown track ignored");
            return Ok(false);
        }

        if let Err(e) = self.store.delete(id).await {
            tracing::error!(track_id = %id, error = %e, "Delete failed, track kept");
            return Err(e.into());
        }

        let Some(removed) = self.playlist.remove(id) else {
            return Ok(false);
        };

        if self.transport.loaded_track() == Some(id) {
            self.transport.stop();
            self.emit_status();
        } else if removed.was_current {
            // The position belonged to the removed track
            self.transport.set_position(0.0);
        }

        tracing::info!(track_id = %id, index = removed.index, "Removed track");
        self.emit(PlayerEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.emit(PlayerEvent::FavoritesChanged {
            count: self.playlist.favorite_count(),
        });
        self.save();
        Ok(true)
    }

    /// Flip a track's favorite mark
    ///
    /// Returns the new membership, or `None` if the track is not in the
    /// playlist.
    pub fn toggle_favorite(&mut self, id: &TrackId) -> Option<bool> {
        let favorite = self.playlist.toggle_favorite(id);

        match favorite {
            Some(is_favorite) => {
                tracing::debug!(track_id = %id, is_favorite, "Toggled favorite");
                self.emit(PlayerEvent::FavoritesChanged {
                    count: self.playlist.favorite_count(),
                });
                self.save();
            }
            None => tracing::debug!(track_id = %id, "Favorite toggle on unknown track ignored"),
        }

        favorite
    }

    // ===== Transport =====

    /// Play or pause the current track
    ///
    /// Does nothing while the playlist is empty.
    pub async fn toggle_play(&mut self) -> Result<()> {
        let Some(index) = self.playlist.current_index() else {
            return Ok(());
        };

        match self.transport.status() {
            PlaybackStatus::Playing => {
                self.transport.pause();
                self.emit_status();
            }
            PlaybackStatus::Paused if self.current_is_loaded() => {
                self.transport.play()?;
                self.emit_status();
            }
            _ => self.load_and_play(index).await?,
        }

        self.save();
        Ok(())
    }

    /// Advance to the next track, wrapping at the end
    ///
    /// Under shuffle any track may come next.
    pub async fn play_next(&mut self) -> Result<()> {
        let next = self
            .transport
            .next_index(self.playlist.current_index(), self.playlist.len());
        let Some(index) = next else {
            return Ok(());
        };

        self.load_and_play(index).await?;
        self.save();
        Ok(())
    }

    /// Go back to the previous track, wrapping at the start
    ///
    /// Under shuffle this picks a random track, the same as next.
    pub async fn play_previous(&mut self) -> Result<()> {
        let previous = self
            .transport
            .previous_index(self.playlist.current_index(), self.playlist.len());
        let Some(index) = previous else {
            return Ok(());
        };

        self.load_and_play(index).await?;
        self.save();
        Ok(())
    }

    /// Play the track at `index` (a playlist or favorites click)
    pub async fn play_track_at(&mut self, index: usize) -> Result<()> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        self.load_and_play(index).await?;
        self.save();
        Ok(())
    }

    /// Play the track with this id
    pub async fn play_track(&mut self, id: &TrackId) -> Result<()> {
        let index = self
            .playlist
            .position_of(id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.clone()))?;
        self.play_track_at(index).await
    }

    /// React to the loaded track reaching its natural end
    ///
    /// Repeat one restarts it, repeat all advances (wrapping), and with
    /// repeat off playback advances unless this was the last track, in which
    /// case it stops.
    pub async fn handle_track_end(&mut self) -> Result<()> {
        let Some(current) = self.playlist.current_index() else {
            return Ok(());
        };
        let Some(finished) = self.transport.loaded_track().cloned() else {
            return Ok(());
        };

        tracing::debug!(track_id = %finished, repeat = %self.transport.repeat_mode(), "Track ended");
        self.emit(PlayerEvent::TrackEnded { track_id: finished });

        match self.transport.end_of_track(current, self.playlist.len()) {
            EndOfTrack::Restart => {
                self.transport.restart()?;
                self.emit_status();
            }
            EndOfTrack::Advance => {
                // The finished track must not resume at its end next time
                self.transport.set_position(0.0);
                self.save();
                return self.play_next().await;
            }
            EndOfTrack::Stop => {
                self.transport.stop();
                self.emit_status();
            }
        }

        self.save();
        Ok(())
    }

    /// Flip shuffle; only future advances are affected
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = self.transport.toggle_shuffle();
        tracing::debug!(enabled, "Shuffle toggled");
        self.emit(PlayerEvent::ShuffleChanged { enabled });
        self.save();
        enabled
    }

    /// Cycle the repeat mode none → one → all → none
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        let mode = self.transport.cycle_repeat();
        tracing::debug!(%mode, "Repeat mode changed");
        self.emit(PlayerEvent::RepeatChanged { mode });
        self.save();
        mode
    }

    /// Seek to `fraction` (0.0-1.0) of the loaded track
    ///
    /// Returns `Ok(false)` without changing anything while the track length
    /// is unknown.
    pub fn seek_to(&mut self, fraction: f64) -> Result<bool> {
        match self.transport.seek_fraction(fraction)? {
            Some(position) => {
                tracing::debug!(fraction, position, "Seeked");
                self.emit_position();
                self.save();
                Ok(true)
            }
            None => {
                tracing::debug!(fraction, "Seek ignored, duration unknown");
                Ok(false)
            }
        }
    }

    /// Set the volume (0-100); the output gain is `percent / 100`
    pub fn set_volume(&mut self, percent: u8) {
        self.transport.set_volume(percent);
        self.emit_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.transport.toggle_mute();
        self.emit_volume();
    }

    // ===== Media callbacks =====

    /// Progress report from the media output
    ///
    /// Updates the position and emits a progress event. The cache is written
    /// only once the position has moved by at least the configured save
    /// interval since the last write.
    pub fn on_position_tick(&mut self, position: Duration) {
        if self.transport.loaded_track().is_none() {
            return;
        }

        self.transport.set_position(position.as_secs_f64());
        self.emit_position();

        let interval = self.config.position_save_interval.as_secs_f64();
        if (self.transport.position() - self.last_position_save).abs() >= interval {
            self.save();
        }
    }

    /// The media output resolved the loaded track's length
    ///
    /// The duration is recorded in the playlist, mirrored to the cache and
    /// written back to the track store.
    pub async fn on_metadata_loaded(&mut self, duration: Duration) -> Result<()> {
        let id = self
            .transport
            .loaded_track()
            .cloned()
            .ok_or(PlaybackError::NoTrackLoaded)?;

        let seconds = duration.as_secs_f64();
        if seconds <= 0.0 {
            return Ok(());
        }

        let track = self
            .playlist
            .set_duration(&id, seconds)
            .cloned()
            .ok_or_else(|| PlaybackError::TrackNotFound(id.clone()))?;

        tracing::debug!(track_id = %id, duration = seconds, "Duration resolved");
        self.emit(PlayerEvent::DurationResolved {
            track_id: id.clone(),
            duration: seconds,
        });
        self.save();

        if let Err(e) = self.store.put(&track).await {
            tracing::error!(track_id = %id, error = %e, "Failed to store resolved duration");
            return Err(e.into());
        }
        Ok(())
    }

    /// Let `elapsed` media time pass on outputs driven by the caller's clock
    ///
    /// Reports the new position and handles the end of the track.
    pub async fn tick(&mut self, elapsed: Duration) -> Result<()> {
        if !self.transport.is_playing() {
            return Ok(());
        }

        let ended = self.transport.advance(elapsed);
        self.on_position_tick(Duration::from_secs_f64(self.transport.position()));

        if ended {
            self.handle_track_end().await?;
        }
        Ok(())
    }

    /// Write the session to the cache now, bypassing the position throttle
    ///
    /// Call before shutting down so the last reported position survives.
    pub fn flush(&mut self) {
        self.save();
    }

    // ===== Queries =====

    pub fn playlist(&self) -> &PlaylistModel {
        &self.playlist
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn status(&self) -> PlaybackStatus {
        self.transport.status()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Transport state as it would be written to the cache
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_time: self.transport.position(),
            is_playing: self.transport.is_playing(),
            current_track_index: self.playlist.current_index(),
            is_shuffled: self.transport.is_shuffled(),
            repeat_mode: self.transport.repeat_mode(),
        }
    }

    /// Drain all pending events
    ///
    /// Call after each handled action to refresh the UI.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Load the track at `index` and start playing it
    ///
    /// The last saved position is restored only if the saved index still
    /// names this very track; otherwise playback starts at 0.
    async fn load_and_play(&mut self, index: usize) -> Result<()> {
        let track = self
            .playlist
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        let start_at = self.resume_position(&track.id);

        self.playlist.select(index)?;
        if let Err(e) = self.transport.load(&track, start_at) {
            self.transport.stop();
            self.emit_status();
            return Err(e);
        }
        self.transport.play()?;

        tracing::debug!(track_id = %track.id, index, start_at, "Playing track");
        self.emit(PlayerEvent::TrackChanged {
            track_id: track.id.clone(),
            index,
            title: track.title.clone(),
            artist: track.artist.clone(),
        });
        self.emit_status();

        if track.duration().is_none() {
            if let Some(duration) = self.transport.duration() {
                if let Err(e) = self.on_metadata_loaded(duration).await {
                    tracing::warn!(track_id = %track.id, error = %e, "Duration not recorded");
                }
            }
        }
        Ok(())
    }

    fn resume_position(&self, id: &TrackId) -> f64 {
        self.saved
            .as_ref()
            .filter(|saved| {
                saved
                    .current_track_index
                    .and_then(|i| self.playlist.get(i))
                    .is_some_and(|t| &t.id == id)
            })
            .map_or(0.0, |saved| saved.current_time)
    }

    fn current_is_loaded(&self) -> bool {
        match (self.playlist.current(), self.transport.loaded_track()) {
            (Some(current), Some(loaded)) => &current.id == loaded,
            _ => false,
        }
    }

    /// Mirror the whole session to the cache
    fn save(&mut self) {
        let snapshot = self.snapshot();
        self.cache
            .save(self.playlist.tracks(), self.playlist.favorites(), &snapshot);
        self.last_position_save = snapshot.current_time;
        self.saved = Some(snapshot);
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_status(&mut self) {
        self.emit(PlayerEvent::StatusChanged {
            status: self.transport.status(),
        });
    }

    fn emit_volume(&mut self) {
        let volume = self.transport.volume();
        let event = PlayerEvent::VolumeChanged {
            level: volume.level(),
            is_muted: volume.is_muted(),
        };
        self.emit(event);
    }

    fn emit_position(&mut self) {
        let position = self.transport.position();
        let duration = self.transport.duration().map(|d| d.as_secs_f64());
        self.emit(PlayerEvent::PositionChanged {
            position,
            duration,
            elapsed_label: format_time(position),
            duration_label: format_time(duration.unwrap_or(0.0)),
        });
    }

    pub(crate) fn emit_error(&mut self, error: &PlaybackError) {
        self.emit(PlayerEvent::Error {
            message: error.to_string(),
        });
    }
}

/// Order stored tracks as the cached playlist listed them
fn order_by_cache(mut stored: Vec<Track>, cached: Option<&[Track]>) -> Vec<Track> {
    let Some(cached) = cached else {
        return stored;
    };

    let rank: HashMap<&TrackId, usize> = cached
        .iter()
        .enumerate()
        .map(|(i, t)| (&t.id, i))
        .collect();
    stored.sort_by_key(|t| rank.get(&t.id).copied().unwrap_or(usize::MAX));
    stored
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("tracks", &self.playlist.len())
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
