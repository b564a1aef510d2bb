//! Import surface
//!
//! A batch of dropped or picked files. Only entries whose declared media type
//! is `audio/*` become tracks; the rest are counted and skipped.

use bytes::Bytes;
use explayer_core::TrackId;
use serde::Serialize;

/// A file offered for import
#[derive(Debug, Clone)]
pub struct ImportFile {
    /// File name, extension included
    pub name: String,
    /// Declared media type, e.g. `audio/mpeg`
    pub media_type: String,
    pub data: Bytes,
}

impl ImportFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Whether the declared media type is audio
    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with("audio/")
    }
}

/// An import that was attempted and failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFailure {
    pub name: String,
    pub message: String,
}

/// Outcome of an import batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Ids of the new tracks, in import order
    pub imported: Vec<TrackId>,
    /// Entries skipped because they were not audio
    pub skipped_non_audio: usize,
    pub failed: Vec<ImportFailure>,
}
