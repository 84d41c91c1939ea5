//! Generation service integration
//!
//! Traits for the two external collaborators (file hosting and content
//! generation) plus the Gemini implementations and in-memory mocks.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiFileClient, GeminiGenerationClient};
pub use mock::{MockGenerationClient, MockUploadClient};

use crate::extract::GenerationResponse;
use crate::models::UploadedFileRef;
use crate::request::GenerationRequest;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Hosts a file with the generation service so requests can reference it.
#[async_trait]
pub trait FileUploadService: Send + Sync {
    /// Upload an in-memory buffer.
    async fn upload_bytes(
        &self,
        data: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFileRef>;

    /// Upload a file that already exists on local disk.
    async fn upload_path(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFileRef>;
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}
