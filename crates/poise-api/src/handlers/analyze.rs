//! Video analysis handler.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use poise_analyzer::AnalysisLogger;
use poise_models::AnalysisResult;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestId;
use crate::state::AppState;

/// Multipart field carrying the recording.
pub const FILE_FIELD: &str = "file";

/// Analyze an uploaded recording.
///
/// Expects a multipart body with a non-empty `file` field.
pub async fn analyze(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisResult>> {
    let request_id = request_id
        .map(|Extension(id)| id.0)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            let filename = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            upload = Some((filename, bytes));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("Missing 'file' field in multipart body"))?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    info!(
        request_id = %request_id,
        filename = filename.as_deref().unwrap_or("<unnamed>"),
        bytes = bytes.len(),
        "Received analysis upload"
    );

    let logger = AnalysisLogger::new(request_id);
    let output = state.pipeline.analyze(&bytes, &logger).await.map_err(|e| {
        warn!(request_id = %logger.request_id(), error = %e, "Analysis failed");
        ApiError::from(e)
    })?;

    Ok(Json(output.result))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(err.body_text())
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}
