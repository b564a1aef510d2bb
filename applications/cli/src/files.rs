/// Reading files from disk for import
use crate::error::{CliError, Result};
use explayer_playback::ImportFile;
use std::path::Path;

/// Read a file and tag it with the media type guessed from its extension
pub async fn read_import_file(path: &Path) -> Result<ImportFile> {
    let data = tokio::fs::read(path).await.map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    Ok(ImportFile::new(name, media_type(path), data))
}

/// Media type for a path, `application/octet-stream` when unknown
pub fn media_type(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}
