use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let summary = state.session_service.summary().await;
    let body = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "open_sessions": summary.sessions,
    });
    (StatusCode::OK, Json(body))
}
