//! Data models and structures
//!
//! Defines the request/response shapes of the analyze endpoint, the
//! reference handed back by the file-hosting service, and runtime
//! configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// A file field exactly as it arrived in the multipart form.
#[derive(Debug, Clone, Default)]
pub struct IncomingFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// One call to the analyze endpoint.
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub file: Option<IncomingFile>,
    pub query: String,
}

impl IncomingRequest {
    pub fn text_only(query: impl Into<String>) -> Self {
        Self {
            file: None,
            query: query.into(),
        }
    }

    pub fn with_file(
        query: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file: Some(IncomingFile {
                filename: Some(filename.into()),
                content_type: Some(content_type.into()),
                data,
            }),
            query: query.into(),
        }
    }
}

/// Handle to a file hosted by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFileRef {
    pub uri: String,
    pub mime_type: String,
}

/// Body returned by the analyze endpoint.
///
/// Serializes as `{"status":"success","analysis":..}` or
/// `{"status":"error","message":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success { analysis: String },
    Error { message: String },
}

impl AnalysisResult {
    pub fn success(analysis: impl Into<String>) -> Self {
        Self::Success {
            analysis: analysis.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let model = lookup("GEMINI_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                crate::Error::Config(format!("Invalid GEMINI_TIMEOUT_SECS '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                crate::Error::Config(format!("Invalid MAX_UPLOAD_BYTES '{}'", raw))
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            gemini_api_key,
            model,
            timeout_secs,
            max_upload_bytes,
        })
    }
}
