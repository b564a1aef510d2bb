//! ExPlayer Core
//!
//! Platform-agnostic core types, traits, and error handling for ExPlayer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `RepeatMode`, `PlaybackSnapshot`, `SessionSnapshot`
//! - **Core Traits**: `TrackStore` (durable, async) and `KeyValueStore` (fast, synchronous)
//! - **Error Handling**: Unified `ExError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use explayer_core::types::{RepeatMode, Track};
//!
//! let track = Track::from_file("Morning Song.mp3", vec![0u8; 16]);
//! assert_eq!(track.title, "Morning Song");
//! assert_eq!(track.artist, "Unknown");
//! assert!(track.duration().is_none());
//!
//! assert_eq!(RepeatMode::Off.next(), RepeatMode::One);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ExError, Result};
pub use time::format_time;
pub use traits::{KeyValueStore, TrackStore};

pub use types::{PlaybackSnapshot, RepeatMode, SessionSnapshot, Track, TrackId, UNKNOWN_ARTIST};
