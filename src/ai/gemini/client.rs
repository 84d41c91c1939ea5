use super::types::{FileResource, UploadFileResponse};
use crate::{Error, Result};
use reqwest::{Body, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Lightweight Gemini REST client shared by the generation and file modules.
pub struct GeminiHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn describe_failure(response: reqwest::Response, context: &str) -> String {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("{} (status {}): {}", context, status, error_text);
        format!("{} (status {}): {}", context, status, error_text)
    }

    async fn parse_body<Resp: DeserializeOwned>(response: reqwest::Response) -> Result<Resp> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Calls Gemini's `generateContent` endpoint for `model` (bare model ID).
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        model: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let message = Self::describe_failure(response, "generateContent failed").await;
            return Err(Error::AiProvider(message));
        }

        Self::parse_body(response).await
    }

    /// Opens a resumable upload session and returns its upload URL.
    pub async fn start_upload(
        &self,
        display_name: &str,
        mime_type: &str,
        content_length: u64,
    ) -> Result<String> {
        let url = format!("{}/upload/v1beta/files", self.base_url);
        let metadata = json!({ "file": { "display_name": display_name } });

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header(
                "X-Goog-Upload-Header-Content-Length",
                content_length.to_string(),
            )
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&metadata)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = Self::describe_failure(response, "Upload start failed").await;
            return Err(Error::Upload(message));
        }

        response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::Upload("No upload URL in upload start response".to_string()))
    }

    /// Sends the whole payload to an upload session and finalizes it.
    pub async fn finish_upload(
        &self,
        upload_url: &str,
        content_length: u64,
        body: Body,
    ) -> Result<FileResource> {
        let response = self
            .client
            .post(upload_url)
            .timeout(self.timeout)
            .header("Content-Length", content_length.to_string())
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = Self::describe_failure(response, "Upload finalize failed").await;
            return Err(Error::Upload(message));
        }

        let uploaded: UploadFileResponse = Self::parse_body(response).await?;
        Ok(uploaded.file)
    }

    /// Fetches a hosted file by resource name (`files/...`).
    pub async fn get_file(&self, name: &str) -> Result<FileResource> {
        let url = format!("{}/v1beta/{}", self.base_url, name);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = Self::describe_failure(response, "File lookup failed").await;
            return Err(Error::Upload(message));
        }

        Self::parse_body(response).await
    }
}

/// Strips a leading `models/` so the ID can be spliced into endpoint paths.
pub fn normalize_model(model: &str) -> String {
    model.strip_prefix("models/").unwrap_or(model).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_model() {
        assert_eq!(normalize_model("models/gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(normalize_model("gemini-2.5-flash"), "gemini-2.5-flash");
    }
}
