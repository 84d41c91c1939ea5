//! Orchestrates one analysis: ingest, upload, build, generate, extract.

use crate::ai::{FileUploadService, GeminiFileClient, GeminiGenerationClient, GenerationService};
use crate::extract::extract_text;
use crate::ingest::ingest;
use crate::models::{AnalysisResult, Config, IncomingRequest};
use crate::request::build_request;
use crate::upload::{RemoteUploader, UploadStrategy};
use crate::Result;
use std::time::Duration;
use tracing::{error, info, Instrument};
use uuid::Uuid;

/// Stateless pipeline shared by every request.
pub struct Analyzer {
    uploader: RemoteUploader,
    generator: Box<dyn GenerationService>,
}

/// Injectable service bundle used to construct [`Analyzer`] in tests.
pub struct AnalyzerServices {
    pub upload: Box<dyn FileUploadService>,
    pub generation: Box<dyn GenerationService>,
}

impl Analyzer {
    pub fn with_services(services: AnalyzerServices) -> Self {
        Self {
            uploader: RemoteUploader::new(services.upload),
            generator: services.generation,
        }
    }

    /// Gemini-backed analyzer; both clients share one connection pool.
    pub fn from_config(config: &Config) -> Self {
        let http_client = reqwest::Client::new();
        let timeout = Duration::from_secs(config.timeout_secs);

        info!("Generation model: {}", config.model);

        Self::with_services(AnalyzerServices {
            upload: Box::new(GeminiFileClient::new_with_client(
                config.gemini_api_key.clone(),
                timeout,
                http_client.clone(),
            )),
            generation: Box::new(GeminiGenerationClient::new_with_client(
                config.gemini_api_key.clone(),
                config.model.clone(),
                timeout,
                http_client,
            )),
        })
    }

    pub fn with_upload_strategies(mut self, strategies: Vec<UploadStrategy>) -> Self {
        self.uploader = self.uploader.with_strategies(strategies);
        self
    }

    /// Never fails: every error becomes an error result.
    pub async fn analyze(&self, request: IncomingRequest) -> AnalysisResult {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("analyze", %request_id);

        async {
            match self.run(request).await {
                Ok(analysis) => AnalysisResult::success(analysis),
                Err(e) => {
                    error!("Analysis failed: {}", e);
                    AnalysisResult::error(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: IncomingRequest) -> Result<String> {
        let file = ingest(request.file);

        let uploaded = match &file {
            Some(file) => {
                info!(
                    "Uploading '{}' ({} bytes, {})",
                    file.filename,
                    file.data.len(),
                    file.mime_type
                );
                self.uploader.upload(file).await
            }
            None => None,
        };

        let generation_request = build_request(uploaded, &request.query);
        info!(
            "Sending generation request with {} part(s), file attached: {}",
            generation_request.parts().len(),
            generation_request.file_reference().is_some()
        );

        let response = self.generator.generate(&generation_request).await?;

        let analysis = extract_text(&response);
        info!("Analysis length: {} characters", analysis.chars().count());

        Ok(analysis)
    }
}
