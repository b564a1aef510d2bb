mod ids;
mod playback_state;
mod session;
mod track;

pub use ids::TrackId;
pub use playback_state::{PlaybackSnapshot, RepeatMode};
pub use session::SessionSnapshot;
pub use track::{title_from_file_name, Track, UNKNOWN_ARTIST};
