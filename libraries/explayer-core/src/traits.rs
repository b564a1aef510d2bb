/// Core traits for ExPlayer storage backends
use crate::error::Result;
use crate::types::{Track, TrackId};
use async_trait::async_trait;

/// Durable track storage
///
/// The authoritative record of imported tracks, surviving restarts. Every
/// operation is asynchronous; a track is only durable once the returned
/// future has completed successfully.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Insert or replace a track, keyed by its id
    ///
    /// # Errors
    /// Returns `ExError::Storage` if the write fails
    async fn put(&self, track: &Track) -> Result<()>;

    /// Read every stored track, in id order
    ///
    /// Each call re-reads the store.
    ///
    /// # Errors
    /// Returns `ExError::Storage` if the read fails
    async fn get_all(&self) -> Result<Vec<Track>>;

    /// Delete a track by id (no-op if absent)
    ///
    /// # Errors
    /// Returns `ExError::Storage` if the delete fails
    async fn delete(&self, id: &TrackId) -> Result<()>;
}

/// Synchronous string key-value storage
///
/// Values are small and written whole. A write is visible to the next read.
pub trait KeyValueStore: Send {
    /// Read a value
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value (no-op if absent)
    fn remove_item(&mut self, key: &str) -> Result<()>;
}
