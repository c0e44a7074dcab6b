// figma-report-service/src/server.rs

use crate::error::ReportError;
use crate::models::{ReportRequest, ReportResponse};
use crate::pipeline::ReportPipeline;
use crate::storage::ArtifactStore;
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReportPipeline>,
    pub store: ArtifactStore,
    pub service_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DiagramRequest {
    pub figma_url: String,
}

/// Create the main application with all routes
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate", post(generate_report))
        .route("/api/diagram", post(generate_diagram))
        .route("/api/download/:filename", get(download_artifact))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> ResponseJson<Value> {
    ResponseJson(json!({
        "status": "healthy",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run the full pipeline for a Figma URL and report download links.
async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    info!(request_id = %request_id, figma_url = %request.figma_url, "Report requested");

    match state.pipeline.process(&request_id, &request).await {
        Ok(response) => (StatusCode::OK, ResponseJson(response)).into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Report generation failed");
            (
                error_status(&e),
                ResponseJson(ReportResponse::error(request_id, e.to_string())),
            )
                .into_response()
        }
    }
}

/// Standalone architecture diagram as a data URI, for frontends that
/// preview the image without downloading a report.
async fn generate_diagram(
    State(state): State<AppState>,
    Json(request): Json<DiagramRequest>,
) -> Response {
    match state.pipeline.diagram_png(&request.figma_url).await {
        Ok(png) => ResponseJson(json!({
            "success": true,
            "image_b64": format!(
                "data:image/png;base64,{}",
                general_purpose::STANDARD.encode(&png)
            ),
        }))
        .into_response(),
        Err(e) => {
            error!(figma_url = %request.figma_url, error = %e, "Diagram generation failed");
            (error_status(&e), ResponseJson(e.to_error_response())).into_response()
        }
    }
}

async fn download_artifact(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let path = match state.store.resolve(&filename).await {
        Ok(path) => path,
        Err(e) => return (error_status(&e), ResponseJson(e.to_error_response())).into_response(),
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let headers = [
                (header::CONTENT_TYPE, content_type_for(&filename)),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ];
            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(e) => {
            error!(filename = %filename, error = %e, "Failed to read artifact");
            let err = ReportError::IoError(e);
            (error_status(&err), ResponseJson(err.to_error_response())).into_response()
        }
    }
}

fn error_status(error: &ReportError) -> StatusCode {
    StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn content_type_for(filename: &str) -> String {
    match filename.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("md") => "text/markdown; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
    .to_string()
}
