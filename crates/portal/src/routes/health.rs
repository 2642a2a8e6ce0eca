//! Health check endpoints.

use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::state::AppState;

/// Liveness: the process is serving requests.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness: the laundry API answers.
///
/// Any response below 500 counts; the API root may well be a 404.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().ping().await {
        Ok(status) if !status.is_server_error() => StatusCode::OK,
        Ok(status) => {
            warn!(status = status.as_u16(), "API not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            warn!(error = %e, "API unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
