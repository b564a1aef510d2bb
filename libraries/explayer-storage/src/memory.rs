//! In-memory track store
//!
//! Same contract as the SQLite store, without durability. Used for
//! ephemeral sessions and tests.

use async_trait::async_trait;
use explayer_core::{
    error::Result,
    types::{Track, TrackId},
    TrackStore,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Track store held in memory, ordered by id
#[derive(Debug, Default)]
pub struct MemoryTrackStore {
    tracks: RwLock<BTreeMap<TrackId, Track>>,
}

impl MemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with tracks
    pub fn with_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        Self {
            tracks: RwLock::new(tracks.into_iter().map(|t| (t.id.clone(), t)).collect()),
        }
    }

    /// Number of stored tracks
    pub async fn len(&self) -> usize {
        self.tracks.read().await.len()
    }

    /// Whether the store holds no tracks
    pub async fn is_empty(&self) -> bool {
        self.tracks.read().await.is_empty()
    }

    /// Whether a track with this id is stored
    pub async fn contains(&self, id: &TrackId) -> bool {
        self.tracks.read().await.contains_key(id)
    }
}

#[async_trait]
impl TrackStore for MemoryTrackStore {
    async fn put(&self, track: &Track) -> Result<()> {
        self.tracks
            .write()
            .await
            .insert(track.id.clone(), track.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: &TrackId) -> Result<()> {
        self.tracks.write().await.remove(id);
        Ok(())
    }
}
