//! Hosts an ingested file with the generation service.
//!
//! Strategies are tried in order and the first success wins. When every
//! strategy fails the caller gets `None` and continues text-only; upload
//! failures never fail an analysis.

use crate::ai::FileUploadService;
use crate::ingest::IngestedFile;
use crate::models::UploadedFileRef;
use crate::Result;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    /// Send the in-memory buffer directly.
    InMemory,
    /// Write the buffer to a temp file and upload it by path.
    TempFile,
}

impl UploadStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InMemory => "in-memory",
            Self::TempFile => "temp-file",
        }
    }
}

pub const DEFAULT_STRATEGIES: [UploadStrategy; 2] =
    [UploadStrategy::InMemory, UploadStrategy::TempFile];

pub struct RemoteUploader {
    service: Box<dyn FileUploadService>,
    strategies: Vec<UploadStrategy>,
}

impl RemoteUploader {
    pub fn new(service: Box<dyn FileUploadService>) -> Self {
        Self {
            service,
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<UploadStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub async fn upload(&self, file: &IngestedFile) -> Option<UploadedFileRef> {
        for strategy in &self.strategies {
            match self.attempt(*strategy, file).await {
                Ok(uploaded) => {
                    info!(
                        "Uploaded '{}' ({}): uri={}, mime_type={}",
                        file.filename,
                        strategy.name(),
                        uploaded.uri,
                        uploaded.mime_type
                    );
                    return Some(uploaded);
                }
                Err(e) => warn!(
                    "Upload of '{}' with {} strategy failed: {}",
                    file.filename,
                    strategy.name(),
                    e
                ),
            }
        }

        warn!(
            "No upload strategy succeeded for '{}', continuing without the file",
            file.filename
        );
        None
    }

    async fn attempt(
        &self,
        strategy: UploadStrategy,
        file: &IngestedFile,
    ) -> Result<UploadedFileRef> {
        match strategy {
            UploadStrategy::InMemory => {
                self.service
                    .upload_bytes(&file.data, &file.mime_type, &file.filename)
                    .await
            }
            UploadStrategy::TempFile => {
                // Removed from disk when `temp` drops at the end of this arm.
                let temp = write_temp_file(file)?;
                info!("Wrote temp file for upload: {}", temp.path().display());
                self.service
                    .upload_path(temp.path(), &file.mime_type, &file.filename)
                    .await
            }
        }
    }
}

fn write_temp_file(file: &IngestedFile) -> Result<NamedTempFile> {
    let mut temp = tempfile::Builder::new()
        .prefix("levelup-upload-")
        .suffix(&file.suffix())
        .tempfile()?;
    temp.write_all(&file.data)?;
    temp.flush()?;
    Ok(temp)
}
