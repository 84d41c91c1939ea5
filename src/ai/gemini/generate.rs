use super::client::{normalize_model, GeminiHttpClient};
use super::types::GenerateContentRequest;
use crate::ai::GenerationService;
use crate::extract::GenerationResponse;
use crate::request::GenerationRequest;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiGenerationClient {
    http: GeminiHttpClient,
    model: String,
}

impl GeminiGenerationClient {
    /// `model` may be given with or without the `models/` prefix.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, timeout, client),
            model: normalize_model(&model),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiGenerationClient);

#[async_trait]
impl GenerationService for GeminiGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        tracing::debug!(
            "Sending generateContent request ({} parts) to {}",
            request.parts().len(),
            self.model
        );

        let wire = GenerateContentRequest::from(request);
        let body: serde_json::Value = self.http.generate_content(&self.model, &wire).await?;

        Ok(GenerationResponse::from_value(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::extract::extract_text;
    use crate::models::UploadedFileRef;
    use crate::request::build_request;
    use crate::Error;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    fn make_client(server: &MockServer, model: &str) -> GeminiGenerationClient {
        GeminiGenerationClient::new(
            "test-key".to_string(),
            model.to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_parses_candidates() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "Recursion is a function calling itself." }]
                    },
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let response = client
            .generate(&build_request(None, "Explain recursion"))
            .await
            .unwrap();

        assert_eq!(
            extract_text(&response),
            "Recursion is a function calling itself."
        );
    }

    #[tokio::test]
    async fn test_generate_sends_file_part_and_temperature() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "fileData": { "mimeType": "application/pdf", "fileUri": "files/abc123" } },
                        { "text": "User Query: summarize" }
                    ]
                }],
                "generationConfig": { "temperature": 0.3 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "summary" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let request = build_request(
            Some(UploadedFileRef {
                uri: "files/abc123".to_string(),
                mime_type: "application/pdf".to_string(),
            }),
            "summarize",
        );

        client.generate(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.generate(&build_request(None, "")).await.unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_unexpected_body_shape_is_kept_for_extraction() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let response = client.generate(&build_request(None, "")).await.unwrap();

        assert!(matches!(response, GenerationResponse::Unknown(_)));
        assert!(extract_text(&response).contains("blockReason"));
    }

    #[tokio::test]
    async fn test_generate_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "models/gemini-2.5-flash");
        assert_eq!(client.model(), "gemini-2.5-flash");

        client.generate(&build_request(None, "")).await.unwrap();
    }
}
