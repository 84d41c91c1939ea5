//! Normalizes the optional uploaded file of an analyze request.
//!
//! A file without a name or without bytes is treated as "no file"; that is
//! a normal path, not an error.

use crate::models::IncomingFile;
use std::path::Path;
use tracing::info;

const OCTET_STREAM: &str = "application/octet-stream";

/// A file that is worth sending to the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedFile {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl IngestedFile {
    /// Original extension including the leading dot, or `""` when there is none.
    pub fn suffix(&self) -> String {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default()
    }
}

pub fn ingest(file: Option<IncomingFile>) -> Option<IngestedFile> {
    let Some(file) = file else {
        info!("No file supplied");
        return None;
    };

    let filename = match file.filename {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            info!("File field has no filename, ignoring it");
            return None;
        }
    };

    info!(
        "Uploaded file '{}': {} bytes, content_type: {:?}",
        filename,
        file.data.len(),
        file.content_type
    );

    if file.data.is_empty() {
        info!("File '{}' is empty, skipping upload", filename);
        return None;
    }

    let mime_type = resolve_mime_type(file.content_type.as_deref(), &filename);

    Some(IngestedFile {
        filename,
        mime_type,
        data: file.data,
    })
}

/// Keeps a specific declared MIME type, otherwise guesses from the filename.
pub fn resolve_mime_type(declared: Option<&str>, filename: &str) -> String {
    match declared.map(str::trim) {
        Some(declared) if !declared.is_empty() && declared != OCTET_STREAM => declared.to_string(),
        _ => mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string(),
    }
}
