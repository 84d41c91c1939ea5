//! HTTP surface: `POST /analyze` and `GET /health`.

use crate::analyzer::Analyzer;
use crate::models::{AnalysisResult, IncomingFile, IncomingRequest};
use crate::Result;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub fn build_router(analyzer: Arc<Analyzer>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(analyzer)
}

pub async fn serve(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Always answers 200; the outcome is carried by the body's `status` field.
async fn analyze(
    State(analyzer): State<Arc<Analyzer>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Json<AnalysisResult> {
    let request = match multipart {
        Ok(multipart) => read_analyze_form(multipart).await,
        Err(rejection) => {
            // Both form fields are optional, so a body without a form is an empty request.
            warn!("No multipart form in request: {}", rejection);
            Ok(IncomingRequest::default())
        }
    };

    let result = match request {
        Ok(request) => analyzer.analyze(request).await,
        Err(e) => {
            warn!("Failed to read analyze form: {}", e);
            AnalysisResult::error(e.to_string())
        }
    };

    Json(result)
}

/// Reads the `file` and `user_query` (alias `query`) fields; others are skipped.
pub async fn read_analyze_form(mut multipart: Multipart) -> Result<IncomingRequest> {
    let mut request = IncomingRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?.to_vec();
                request.file = Some(IncomingFile {
                    filename,
                    content_type,
                    data,
                });
            }
            "user_query" | "query" => request.query = field.text().await?,
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(request)
}
