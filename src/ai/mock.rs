use super::{FileUploadService, GenerationService};
use crate::extract::GenerationResponse;
use crate::models::UploadedFileRef;
use crate::request::GenerationRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory file host. Clones share state so a clone can act as a probe
/// after the original has been boxed into an analyzer.
#[derive(Clone)]
pub struct MockUploadClient {
    uri: Arc<Mutex<String>>,
    fail_bytes: Arc<Mutex<bool>>,
    fail_path: Arc<Mutex<bool>>,
    bytes_calls: Arc<Mutex<usize>>,
    path_calls: Arc<Mutex<usize>>,
    uploaded_paths: Arc<Mutex<Vec<PathBuf>>>,
    uploaded_payloads: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockUploadClient {
    pub fn new() -> Self {
        Self {
            uri: Arc::new(Mutex::new("files/mock-file".to_string())),
            fail_bytes: Arc::new(Mutex::new(false)),
            fail_path: Arc::new(Mutex::new(false)),
            bytes_calls: Arc::new(Mutex::new(0)),
            path_calls: Arc::new(Mutex::new(0)),
            uploaded_paths: Arc::new(Mutex::new(Vec::new())),
            uploaded_payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_uri(self, uri: String) -> Self {
        *self.uri.lock().unwrap() = uri;
        self
    }

    pub fn with_bytes_failure(self, should_fail: bool) -> Self {
        *self.fail_bytes.lock().unwrap() = should_fail;
        self
    }

    pub fn with_path_failure(self, should_fail: bool) -> Self {
        *self.fail_path.lock().unwrap() = should_fail;
        self
    }

    pub fn get_bytes_call_count(&self) -> usize {
        *self.bytes_calls.lock().unwrap()
    }

    pub fn get_path_call_count(&self) -> usize {
        *self.path_calls.lock().unwrap()
    }

    /// Paths handed to `upload_path`, in call order.
    pub fn get_uploaded_paths(&self) -> Vec<PathBuf> {
        self.uploaded_paths.lock().unwrap().clone()
    }

    /// Bytes received by successful uploads, in call order.
    pub fn get_uploaded_payloads(&self) -> Vec<Vec<u8>> {
        self.uploaded_payloads.lock().unwrap().clone()
    }

    fn file_ref(&self, mime_type: &str) -> UploadedFileRef {
        UploadedFileRef {
            uri: self.uri.lock().unwrap().clone(),
            mime_type: mime_type.to_string(),
        }
    }
}

impl Default for MockUploadClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileUploadService for MockUploadClient {
    async fn upload_bytes(
        &self,
        data: &[u8],
        mime_type: &str,
        _display_name: &str,
    ) -> Result<UploadedFileRef> {
        *self.bytes_calls.lock().unwrap() += 1;

        if *self.fail_bytes.lock().unwrap() {
            return Err(Error::Upload("Mock connection reset".to_string()));
        }

        self.uploaded_payloads.lock().unwrap().push(data.to_vec());
        Ok(self.file_ref(mime_type))
    }

    async fn upload_path(
        &self,
        path: &Path,
        mime_type: &str,
        _display_name: &str,
    ) -> Result<UploadedFileRef> {
        *self.path_calls.lock().unwrap() += 1;
        self.uploaded_paths.lock().unwrap().push(path.to_path_buf());

        if *self.fail_path.lock().unwrap() {
            return Err(Error::Upload("Mock path upload rejected".to_string()));
        }

        let data = std::fs::read(path)?;
        self.uploaded_payloads.lock().unwrap().push(data);
        Ok(self.file_ref(mime_type))
    }
}

/// Generation double that records requests and replays canned responses.
#[derive(Clone)]
pub struct MockGenerationClient {
    responses: Arc<Mutex<Vec<GenerationResponse>>>,
    failure: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_text_response(self, text: &str) -> Self {
        self.with_response(GenerationResponse::DirectText(text.to_string()))
    }

    /// Every call fails with an `AiProvider` error carrying `message`.
    pub fn with_failure(self, message: String) -> Self {
        *self.failure.lock().unwrap() = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(GenerationResponse::DirectText(format!(
                "Mock analysis of {} part(s)",
                request.parts().len()
            )))
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::build_request;

    #[tokio::test]
    async fn test_mock_upload_client_bytes() {
        let client = MockUploadClient::new().with_uri("files/abc".to_string());

        let file = client
            .upload_bytes(b"data", "text/plain", "a.txt")
            .await
            .unwrap();

        assert_eq!(file.uri, "files/abc");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(client.get_bytes_call_count(), 1);
        assert_eq!(client.get_uploaded_payloads(), vec![b"data".to_vec()]);
    }

    #[tokio::test]
    async fn test_mock_upload_client_failures() {
        let client = MockUploadClient::new()
            .with_bytes_failure(true)
            .with_path_failure(true);

        assert!(client.upload_bytes(b"x", "text/plain", "a").await.is_err());
        assert!(client
            .upload_path(Path::new("/nope"), "text/plain", "a")
            .await
            .is_err());
        assert_eq!(client.get_bytes_call_count(), 1);
        assert_eq!(client.get_path_call_count(), 1);
        assert!(client.get_uploaded_payloads().is_empty());
    }

    #[tokio::test]
    async fn test_mock_generation_client_cycles_responses() {
        let client = MockGenerationClient::new()
            .with_text_response("first")
            .with_text_response("second");
        let request = build_request(None, "q");

        let r1 = client.generate(&request).await.unwrap();
        let r2 = client.generate(&request).await.unwrap();
        let r3 = client.generate(&request).await.unwrap();

        assert_eq!(r1, GenerationResponse::DirectText("first".to_string()));
        assert_eq!(r2, GenerationResponse::DirectText("second".to_string()));
        assert_eq!(r3, GenerationResponse::DirectText("first".to_string()));
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_generation_client_failure_still_records_request() {
        let client = MockGenerationClient::new().with_failure("TimeoutError: slow".to_string());

        let err = client.generate(&build_request(None, "q")).await.unwrap_err();

        assert!(err.to_string().contains("TimeoutError: slow"));
        assert_eq!(client.get_call_count(), 1);
    }
}
