//! ExPlayer - Playback Management
//!
//! Playlist, transport and session synchronization for ExPlayer.
//!
//! This crate provides:
//! - Playlist model with favorites (`PlaylistModel`)
//! - Transport state machine with shuffle and repeat policy (`Transport`)
//! - Media output seam (`MediaOutput`) and a device-less output (`HeadlessOutput`)
//! - Volume control (linear, 0-100%, mute/unmute)
//! - The `Player` coordinator keeping memory, track store and session cache in sync
//! - UI event dispatch (`UiEvent`) and a drainable `PlayerEvent` queue
//!
//! # Example
//!
//! ```rust
//! use explayer_playback::{HeadlessOutput, Player, PlayerConfig, UiEvent};
//! use explayer_storage::{MemoryTrackStore, SessionCache};
//! use std::sync::Arc;
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut player = Player::new(
//!     Arc::new(MemoryTrackStore::new()),
//!     SessionCache::in_memory(),
//!     Box::new(HeadlessOutput::new()),
//!     PlayerConfig::default(),
//! );
//! player.restore().await.unwrap();
//!
//! let id = player.import("Intro.mp3", vec![0u8; 16]).await.unwrap();
//! player.handle(UiEvent::ToggleFavorite(id)).await;
//! player.handle(UiEvent::PlayPause).await;
//!
//! for event in player.drain_events() {
//!     println!("{event:?}");
//! }
//! # });
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod handlers;
pub mod import;
pub mod output;
pub mod player;
pub mod playlist;
pub mod shuffle;
pub mod transport;
pub mod types;
pub mod volume;

pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use handlers::UiEvent;
pub use import::{ImportFailure, ImportFile, ImportSummary};
pub use output::{probe_duration, HeadlessOutput, MediaOutput};
pub use player::Player;
pub use playlist::{PlaylistModel, RemovedTrack};
pub use transport::{EndOfTrack, Transport};
pub use types::{PlaybackStatus, PlayerConfig};
pub use volume::Volume;
