//! HTTP route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use super::AppState;
use crate::server::config::FailurePolicy;

/// Plain-text liveness acknowledgement.
pub async fn root() -> &'static str {
    "vidgate caching server is running"
}

/// Error payload surfaced under the error-status failure policy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    message: String,
    video_id: String,
}

/// `GET /api/video2/{videoid}` — the identifier is taken verbatim from the
/// path segment; no validation beyond what the upstream itself rejects.
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Response {
    match state.gateway.get_video(&video_id).await {
        Ok(lookup) => Json(lookup.record.as_ref()).into_response(),
        Err(err) => match state.failure_policy {
            FailurePolicy::FallbackRecord => {
                warn!(video_id, error = %err, "serving fallback record");
                Json(state.fallback.as_ref()).into_response()
            }
            FailurePolicy::ErrorStatus => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = ErrorBody {
                    error: "Failed to fetch video data",
                    message: err.to_string(),
                    video_id,
                };
                (status, Json(body)).into_response()
            }
        },
    }
}
