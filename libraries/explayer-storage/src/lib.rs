//! ExPlayer Storage
//!
//! Persistence for ExPlayer: the durable track store and the session cache.
//!
//! # Architecture
//!
//! - **Track store**: `SqliteTrackStore` keeps imported tracks (payload
//!   included) in a single `tracks` table; `MemoryTrackStore` is the
//!   ephemeral variant.
//! - **Session cache**: `SessionCache` mirrors playlist, favorites and
//!   transport state as three JSON entries in a synchronous
//!   [`KeyValueStore`](explayer_core::KeyValueStore).
//!
//! # Example
//!
//! ```rust,no_run
//! use explayer_core::TrackStore;
//! use explayer_storage::{create_pool, run_migrations, SqliteTrackStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://explayer.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteTrackStore::new(pool);
//! let tracks = store.get_all().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

pub mod kv;
pub mod session;
pub mod tracks;

pub use context::SqliteTrackStore;
pub use error::StorageError;
pub use kv::{FileKeyValueStore, MemoryKeyValueStore};
pub use memory::MemoryTrackStore;
pub use session::SessionCache;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the pool is handed to a store.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://explayer.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
