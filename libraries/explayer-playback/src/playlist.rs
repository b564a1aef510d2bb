//! Playlist model
//!
//! Ordered tracks, the favorites relation and the current index. This is the
//! in-memory source of truth during a session; persistence is driven by the
//! [`Player`](crate::Player) after each mutation.
//!
//! Invariants kept by every method:
//! - every favorite id names a track in the playlist
//! - the current index is valid when the playlist is non-empty, `None` otherwise

use crate::error::{PlaybackError, Result};
use explayer_core::{Track, TrackId};
use std::collections::BTreeSet;

/// A track taken out of the playlist
#[derive(Debug, Clone)]
pub struct RemovedTrack {
    pub track: Track,
    /// Position it had before removal
    pub index: usize,
    /// Whether it was the current track
    pub was_current: bool,
}

/// In-memory playlist with favorites
#[derive(Debug, Clone, Default)]
pub struct PlaylistModel {
    tracks: Vec<Track>,
    favorites: BTreeSet<TrackId>,
    current: Option<usize>,
}

impl PlaylistModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a playlist from restored parts
    ///
    /// Favorites that name no track are dropped; an out-of-range index is
    /// clamped to the last track.
    pub fn from_parts(
        tracks: Vec<Track>,
        favorites: impl IntoIterator<Item = TrackId>,
        current: Option<usize>,
    ) -> Self {
        let favorites = favorites
            .into_iter()
            .filter(|id| tracks.iter().any(|t| &t.id == id))
            .collect();

        let current = if tracks.is_empty() {
            None
        } else {
            Some(current.unwrap_or(0).min(tracks.len() - 1))
        };

        Self {
            tracks,
            favorites,
            current,
        }
    }

    // ===== Tracks =====

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn get_by_id(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Index of the track with this id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.position_of(id).is_some()
    }

    /// Append a track, returning its index
    ///
    /// The first track added to an empty playlist becomes current.
    pub fn add(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        if self.current.is_none() {
            self.current = Some(0);
        }
        self.tracks.len() - 1
    }

    /// Remove a track and its favorite mark
    ///
    /// Returns `None` if the id is not in the playlist. When the removed
    /// index precedes the current one, the current index shifts down so it
    /// keeps naming the same track; when it is the current one, the index
    /// stays put and is clamped.
    pub fn remove(&mut self, id: &TrackId) -> Option<RemovedTrack> {
        let index = self.position_of(id)?;
        let track = self.tracks.remove(index);
        self.favorites.remove(id);

        let was_current = self.current == Some(index);
        self.current = match self.current {
            _ if self.tracks.is_empty() => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) => Some(current.min(self.tracks.len() - 1)),
            None => Some(0),
        };

        Some(RemovedTrack {
            track,
            index,
            was_current,
        })
    }

    /// Record a resolved duration, returning the updated track
    pub fn set_duration(&mut self, id: &TrackId, seconds: f64) -> Option<&Track> {
        let track = self.tracks.iter_mut().find(|t| &t.id == id)?;
        track.duration = seconds;
        Some(track)
    }

    /// Drop every track and favorite
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.favorites.clear();
        self.current = None;
    }

    // ===== Current track =====

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Make `index` the current track
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.current = Some(index);
        Ok(())
    }

    // ===== Favorites =====

    /// Flip favorite membership
    ///
    /// Returns the new membership, or `None` (and changes nothing) when the
    /// id is not in the playlist.
    pub fn toggle_favorite(&mut self, id: &TrackId) -> Option<bool> {
        if !self.contains(id) {
            return None;
        }

        if self.favorites.remove(id) {
            Some(false)
        } else {
            self.favorites.insert(id.clone());
            Some(true)
        }
    }

    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorites.contains(id)
    }

    /// Favorite ids, sorted
    pub fn favorites(&self) -> impl Iterator<Item = &TrackId> {
        self.favorites.iter()
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// Favorite tracks in playlist order
    pub fn favorite_tracks(&self) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| self.favorites.contains(&t.id))
            .collect()
    }
}
