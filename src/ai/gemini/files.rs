use super::client::GeminiHttpClient;
use super::types::{FileResource, FileState};
use crate::ai::FileUploadService;
use crate::models::UploadedFileRef;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Body;
use std::path::Path;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_POLLS: usize = 30;

enum PollError {
    StillProcessing,
    Fatal(Error),
}

/// Files API client: resumable uploads from memory or from disk.
pub struct GeminiFileClient {
    http: GeminiHttpClient,
    poll_interval: Duration,
    max_polls: usize,
}

impl GeminiFileClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, timeout, client),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// How often, and how many times, to re-check a file that is still processing.
    pub fn with_polling(mut self, interval: Duration, max_polls: usize) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn upload(
        &self,
        body: Body,
        content_length: u64,
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFileRef> {
        let upload_url = self
            .http
            .start_upload(display_name, mime_type, content_length)
            .await?;
        let file = self
            .http
            .finish_upload(&upload_url, content_length, body)
            .await?;

        let file = self.wait_until_active(file).await?;
        Ok(file.into_ref(mime_type))
    }

    async fn wait_until_active(&self, file: FileResource) -> Result<FileResource> {
        match file.state {
            Some(FileState::Processing) => {}
            Some(FileState::Failed) => return Err(processing_failed(&file.name)),
            _ => return Ok(file),
        }

        tracing::info!("File {} is processing, waiting for it to become active", file.name);

        let strategy = FixedInterval::new(self.poll_interval).take(self.max_polls);
        let http = &self.http;
        let name = file.name.as_str();

        let polled = RetryIf::spawn(
            strategy,
            || async move {
                let current = http.get_file(name).await.map_err(PollError::Fatal)?;
                match current.state {
                    Some(FileState::Processing) => Err(PollError::StillProcessing),
                    Some(FileState::Failed) => Err(PollError::Fatal(processing_failed(name))),
                    _ => Ok(current),
                }
            },
            |e: &PollError| matches!(e, PollError::StillProcessing),
        )
        .await;

        match polled {
            Ok(file) => Ok(file),
            Err(PollError::StillProcessing) => Err(Error::Upload(format!(
                "File {} still processing after {} checks",
                name, self.max_polls
            ))),
            Err(PollError::Fatal(e)) => Err(e),
        }
    }
}

fn processing_failed(name: &str) -> Error {
    Error::Upload(format!("Gemini failed to process file {}", name))
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiFileClient);

#[async_trait]
impl FileUploadService for GeminiFileClient {
    async fn upload_bytes(
        &self,
        data: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFileRef> {
        tracing::debug!("Uploading {} bytes to Gemini as '{}'", data.len(), display_name);
        self.upload(
            Body::from(data.to_vec()),
            data.len() as u64,
            mime_type,
            display_name,
        )
        .await
    }

    async fn upload_path(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFileRef> {
        let content_length = tokio::fs::metadata(path).await?.len();
        tracing::debug!(
            "Uploading {} ({} bytes) to Gemini as '{}'",
            path.display(),
            content_length,
            display_name
        );
        let file = tokio::fs::File::open(path).await?;
        self.upload(Body::from(file), content_length, mime_type, display_name)
            .await
    }
}
