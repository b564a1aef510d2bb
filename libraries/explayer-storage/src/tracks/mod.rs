//! Track records in the `tracks` table

use crate::StorageError;
use explayer_core::types::{Track, TrackId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// Insert a track, or replace its fields if the id already exists
///
/// The original import timestamp is kept on replace.
pub async fn upsert(pool: &SqlitePool, track: &Track) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO tracks (id, title, artist, data, duration, imported_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id)
         DO UPDATE SET
            title = excluded.title,
            artist = excluded.artist,
            data = excluded.data,
            duration = excluded.duration",
    )
    .bind(&track.id)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.data[..])
    .bind(track.duration)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get all tracks, ordered by id
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query("SELECT id, title, artist, data, duration FROM tracks ORDER BY id")
        .fetch_all(pool)
        .await?;

    rows.iter().map(track_from_row).collect()
}

/// Get a track by id
pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query("SELECT id, title, artist, data, duration FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Delete a track
///
/// Returns `Ok(false)` if no track had that id.
pub async fn delete(pool: &SqlitePool, id: &TrackId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of stored tracks
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM tracks")
        .fetch_one(pool)
        .await?;

    Ok(row.try_get("n")?)
}

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    let data: Vec<u8> = row.try_get("data")?;
    let mut track = Track::with_id(
        row.try_get::<TrackId, _>("id")?,
        row.try_get::<String, _>("title")?,
        row.try_get::<String, _>("artist")?,
        data,
    );
    track.duration = row.try_get("duration")?;
    Ok(track)
}
