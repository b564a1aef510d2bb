//! Session cache
//!
//! A fast, synchronous mirror of the session: playlist records, favorites and
//! transport state, each stored as an independent JSON entry. The cache is
//! best-effort. It is overwritten wholesale on every save, and anything that
//! cannot be decoded on load is treated as never having been saved.
//!
//! # Example
//!
//! ```rust
//! use explayer_core::types::{PlaybackSnapshot, Track, TrackId};
//! use explayer_storage::SessionCache;
//!
//! let mut cache = SessionCache::in_memory();
//! assert!(cache.load().is_none());
//!
//! let track = Track::with_id(TrackId::new("1"), "Intro", "Unknown", Vec::<u8>::new());
//! cache.save(&[track], [&TrackId::new("1")], &PlaybackSnapshot::default());
//!
//! let snapshot = cache.load().unwrap();
//! assert_eq!(snapshot.favorites, Some(vec![TrackId::new("1")]));
//! ```

use crate::kv::MemoryKeyValueStore;
use explayer_core::{
    error::Result,
    types::{PlaybackSnapshot, SessionSnapshot, Track, TrackId},
    KeyValueStore,
};
use serde::de::DeserializeOwned;

/// Entry holding the playlist records
pub const PLAYLIST_KEY: &str = "explayer_playlist";

/// Entry holding the favorite ids
pub const FAVORITES_KEY: &str = "explayer_favorites";

/// Entry holding the transport state
pub const STATE_KEY: &str = "explayer_current_state";

/// Session cache over a synchronous key-value backend
pub struct SessionCache {
    store: Box<dyn KeyValueStore>,
}

impl SessionCache {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Cache that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValueStore::new())
    }

    /// Overwrite the snapshot, logging instead of failing
    pub fn save<'a>(
        &mut self,
        playlist: &[Track],
        favorites: impl IntoIterator<Item = &'a TrackId>,
        playback: &PlaybackSnapshot,
    ) {
        if let Err(e) = self.try_save(playlist, favorites, playback) {
            tracing::warn!(error = %e, "Session cache save failed");
        }
    }

    /// Overwrite the snapshot
    ///
    /// Favorites are written sorted so identical sessions produce identical
    /// entries.
    ///
    /// # Errors
    /// Returns the first backend or serialization failure; entries written
    /// before it are kept.
    pub fn try_save<'a>(
        &mut self,
        playlist: &[Track],
        favorites: impl IntoIterator<Item = &'a TrackId>,
        playback: &PlaybackSnapshot,
    ) -> Result<()> {
        let mut favorites: Vec<&TrackId> = favorites.into_iter().collect();
        favorites.sort();

        self.store
            .set_item(PLAYLIST_KEY, &serde_json::to_string(playlist)?)?;
        self.store
            .set_item(FAVORITES_KEY, &serde_json::to_string(&favorites)?)?;
        self.store
            .set_item(STATE_KEY, &serde_json::to_string(playback)?)?;

        tracing::trace!(
            tracks = playlist.len(),
            favorites = favorites.len(),
            "Session cache saved"
        );
        Ok(())
    }

    /// Read the last snapshot
    ///
    /// Returns `None` when no entry exists or none can be decoded.
    pub fn load(&self) -> Option<SessionSnapshot> {
        let snapshot = SessionSnapshot {
            playlist: self.read_entry::<Vec<Track>>(PLAYLIST_KEY),
            favorites: self.read_entry::<Vec<TrackId>>(FAVORITES_KEY),
            playback: self.read_entry::<PlaybackSnapshot>(STATE_KEY),
        };

        if snapshot.is_empty() {
            None
        } else {
            Some(snapshot)
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        for key in [PLAYLIST_KEY, FAVORITES_KEY, STATE_KEY] {
            if let Err(e) = self.store.remove_item(key) {
                tracing::warn!(key, error = %e, "Session cache clear failed");
            }
        }
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Session cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed session cache entry");
                None
            }
        }
    }
}
