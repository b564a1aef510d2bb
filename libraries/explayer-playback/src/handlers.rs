//! UI event dispatch
//!
//! Every affordance the UI renders maps to one [`UiEvent`]. The UI forwards
//! events to [`Player::handle`] and then drains the player's events to
//! refresh itself. Failures are logged and reported as
//! [`PlayerEvent::Error`](crate::PlayerEvent::Error); they never end the
//! session.

use crate::import::{ImportFile, ImportSummary};
use crate::player::Player;
use explayer_core::TrackId;
use std::time::Duration;

/// User input and media-element callbacks
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Play/pause button
    PlayPause,
    Next,
    Previous,
    ToggleShuffle,
    CycleRepeat,
    /// Seek bar click or drag, as a fraction of the bar
    SeekFraction(f64),
    /// Volume slider (0-100)
    Volume(u8),
    ToggleMute,
    ToggleFavorite(TrackId),
    Remove(TrackId),
    /// Playlist or favorites item click
    PlayIndex(usize),
    /// Drop zone or file picker
    FilesDropped(Vec<ImportFile>),
    /// Media element progress report
    PositionTick(Duration),
    /// Media element resolved the track length
    MetadataLoaded(Duration),
    /// Media element reached the end of the track
    TrackEnded,
}

impl UiEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::PlayPause => "play_pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::ToggleShuffle => "toggle_shuffle",
            Self::CycleRepeat => "cycle_repeat",
            Self::SeekFraction(_) => "seek",
            Self::Volume(_) => "volume",
            Self::ToggleMute => "toggle_mute",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::Remove(_) => "remove",
            Self::PlayIndex(_) => "play_index",
            Self::FilesDropped(_) => "files_dropped",
            Self::PositionTick(_) => "position_tick",
            Self::MetadataLoaded(_) => "metadata_loaded",
            Self::TrackEnded => "track_ended",
        }
    }
}

impl Player {
    /// Apply one UI event
    ///
    /// Returns the import summary for [`UiEvent::FilesDropped`].
    pub async fn handle(&mut self, event: UiEvent) -> Option<ImportSummary> {
        let name = event.name();

        let result = match event {
            UiEvent::PlayPause => self.toggle_play().await,
            UiEvent::Next => self.play_next().await,
            UiEvent::Previous => self.play_previous().await,
            UiEvent::ToggleShuffle => {
                self.toggle_shuffle();
                Ok(())
            }
            UiEvent::CycleRepeat => {
                self.toggle_repeat();
                Ok(())
            }
            UiEvent::SeekFraction(fraction) => self.seek_to(fraction).map(|_| ()),
            UiEvent::Volume(percent) => {
                self.set_volume(percent);
                Ok(())
            }
            UiEvent::ToggleMute => {
                self.toggle_mute();
                Ok(())
            }
            UiEvent::ToggleFavorite(id) => {
                self.toggle_favorite(&id);
                Ok(())
            }
            UiEvent::Remove(id) => self.remove(&id).await.map(|_| ()),
            UiEvent::PlayIndex(index) => self.play_track_at(index).await,
            UiEvent::FilesDropped(files) => return Some(self.import_files(files).await),
            UiEvent::PositionTick(position) => {
                self.on_position_tick(position);
                Ok(())
            }
            UiEvent::MetadataLoaded(duration) => self.on_metadata_loaded(duration).await,
            UiEvent::TrackEnded => self.handle_track_end().await,
        };

        if let Err(e) = result {
            tracing::error!(event = name, error = %e, "UI action failed");
            self.emit_error(&e);
        }
        None
    }
}
