//! Assembles the multimodal generation request.

use crate::models::UploadedFileRef;
use crate::prompts;

/// One unit of a multimodal request. Order inside a request is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    FileReference(UploadedFileRef),
    Text(String),
}

/// Immutable request handed to a [`crate::ai::GenerationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    parts: Vec<ContentPart>,
    system_instruction: &'static str,
    temperature: f32,
}

impl GenerationRequest {
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    pub fn system_instruction(&self) -> &str {
        self.system_instruction
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn file_reference(&self) -> Option<&UploadedFileRef> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::FileReference(file) => Some(file),
            ContentPart::Text(_) => None,
        })
    }
}

/// File reference first (when present), then the labelled query. An empty
/// query still yields a text part.
pub fn build_request(file: Option<UploadedFileRef>, query: &str) -> GenerationRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(file) = file {
        parts.push(ContentPart::FileReference(file));
    }
    parts.push(ContentPart::Text(prompts::user_query(query)));

    GenerationRequest {
        parts,
        system_instruction: prompts::ANALYZE_SYSTEM,
        temperature: prompts::TEMPERATURE,
    }
}
