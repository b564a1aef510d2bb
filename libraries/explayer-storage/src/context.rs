use crate::tracks;
use async_trait::async_trait;
use explayer_core::{
    error::Result,
    types::{Track, TrackId},
    TrackStore,
};
use sqlx::SqlitePool;

/// Durable track store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn put(&self, track: &Track) -> Result<()> {
        tracks::upsert(&self.pool, track).await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Track>> {
        Ok(tracks::get_all(&self.pool).await?)
    }

    async fn delete(&self, id: &TrackId) -> Result<()> {
        if !tracks::delete(&self.pool, id).await? {
            tracing::debug!(track_id = %id, "Delete of unknown track ignored");
        }
        Ok(())
    }
}
