//! HTTP surface for PDF Digest.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Static status payload (`message`, `status`).
//! - `POST /upload-pdf` – Accepts a multipart form with a `file` field, extracts the PDF text,
//!   and returns `{ summary, topics, text_length, filename }`.
//! - `GET /metrics` – Processing counters (documents processed, summary paths, rejections).
//!
//! Errors are reported as `{ "detail": "<message>" }` with a 4xx status for bad uploads and a
//! 500 for anything else. CORS is wide open (any origin, method, and header, with credentials)
//! for local front-end development.

use crate::metrics::MetricsSnapshot;
use crate::processing::{DocumentApi, DocumentDigest, ProcessingError, UploadedDocument};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::MultipartError,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Multipart field that carries the uploaded PDF.
const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the upload API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: DocumentApi + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/upload-pdf", post(upload_pdf::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer())
        .with_state(service)
}

/// Permissive CORS policy: mirrors the caller's origin, methods, and headers and allows
/// credentials. Suitable for local development only.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Response body for `GET /`.
#[derive(Serialize)]
struct StatusResponse {
    message: &'static str,
    status: &'static str,
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "PDF Digest API",
        status: "running",
    })
}

/// Digest an uploaded PDF.
///
/// The filename is checked before the field body is read, so non-PDF uploads are rejected
/// without buffering their contents.
async fn upload_pdf<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<DocumentDigest>, AppError>
where
    S: DocumentApi,
{
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        service.check_filename(&filename)?;
        let bytes = field.bytes().await?;
        upload = Some(UploadedDocument::new(filename, bytes.to_vec()));
        break;
    }

    let upload = upload.ok_or(AppError::MissingFile)?;
    tracing::debug!(filename = %upload.filename, bytes = upload.bytes.len(), "Upload received");
    let digest = service.process_upload(upload).await?;
    Ok(Json(digest))
}

/// Return a snapshot of processing counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: DocumentApi,
{
    Json(service.metrics_snapshot())
}

enum AppError {
    Processing(ProcessingError),
    Multipart(MultipartError),
    MissingFile,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Processing(error) => {
                let status = if error.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, error.to_string())
            }
            Self::Multipart(error) => (
                error.status(),
                format!("Invalid multipart payload: {}", error.body_text()),
            ),
            Self::MissingFile => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "No file uploaded".to_string(),
            ),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}
