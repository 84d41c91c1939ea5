//! Gemini wire types for `generateContent` and the Files API.

use crate::models::UploadedFileRef;
use crate::request::{ContentPart, GenerationRequest};
use serde::{Deserialize, Serialize};

/// Gemini content container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// Untagged union of text and hosted-file parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

/// Reference to a file previously stored through the Files API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

impl From<&ContentPart> for Part {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::FileReference(file) => Part::FileData {
                file_data: FileData {
                    mime_type: file.mime_type.clone(),
                    file_uri: file.uri.clone(),
                },
            },
            ContentPart::Text(text) => Part::Text { text: text.clone() },
        }
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.system_instruction().to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: request.parts().iter().map(Part::from).collect(),
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature(),
            },
        }
    }
}

/// Processing state of a hosted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    StateUnspecified,
    Processing,
    Active,
    Failed,
    #[serde(other)]
    Unknown,
}

/// File resource as returned by the Files API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub state: Option<FileState>,
}

impl FileResource {
    pub fn into_ref(self, requested_mime_type: &str) -> UploadedFileRef {
        UploadedFileRef {
            uri: self.uri,
            mime_type: self
                .mime_type
                .unwrap_or_else(|| requested_mime_type.to_string()),
        }
    }
}

/// Envelope of a finalized upload.
#[derive(Debug, Deserialize)]
pub struct UploadFileResponse {
    pub file: FileResource,
}
