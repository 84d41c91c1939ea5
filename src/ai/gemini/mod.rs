pub mod client;
pub mod files;
pub mod generate;
pub mod types;

pub use files::GeminiFileClient;
pub use generate::GeminiGenerationClient;

#[cfg(test)]
macro_rules! impl_with_gemini_base_url {
    ($client:ty) => {
        impl $client {
            pub(crate) fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }
        }
    };
}

#[cfg(test)]
pub(crate) use impl_with_gemini_base_url;

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

    pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";
    pub const UPLOAD_START_PATH: &str = "/upload/v1beta/files";
    pub const UPLOAD_SESSION_PATH: &str = "/upload/session/1";

    pub fn post_path_regex(regex: &str) -> MockBuilder {
        Mock::given(method("POST")).and(path_regex(regex))
    }

    pub fn file_uri(name: &str) -> String {
        format!("https://generativelanguage.googleapis.com/v1beta/{}", name)
    }

    /// File resource as returned by `GET /v1beta/files/{id}`.
    pub fn resource_json(name: &str, mime_type: &str, state: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "uri": file_uri(name),
            "mimeType": mime_type,
            "state": state
        })
    }

    /// Finalized-upload envelope around a file resource.
    pub fn file_json(name: &str, mime_type: &str, state: &str) -> serde_json::Value {
        serde_json::json!({ "file": resource_json(name, mime_type, state) })
    }

    /// Answers the resumable-upload start call with a session on `server`.
    pub async fn mount_upload_start(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(UPLOAD_START_PATH))
            .respond_with(ResponseTemplate::new(200).insert_header(
                "x-goog-upload-url",
                format!("{}{}", server.uri(), UPLOAD_SESSION_PATH).as_str(),
            ))
            .mount(server)
            .await;
    }

    pub async fn mount_upload_finish(
        server: &MockServer,
        name: &str,
        mime_type: &str,
        state: &str,
    ) {
        Mock::given(method("POST"))
            .and(path(UPLOAD_SESSION_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(file_json(name, mime_type, state)),
            )
            .mount(server)
            .await;
    }
}
