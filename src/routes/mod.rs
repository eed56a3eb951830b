pub mod docs;
pub mod health;
pub mod quiz;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    let quiz_api = Router::new()
        .route("/api/quiz/generate", post(quiz::generate_quiz))
        .route("/api/quiz/grade", post(quiz::grade_answer))
        .route("/api/quiz/score", post(quiz::score_quiz));

    let session_api = Router::new()
        .route("/api/sessions", post(session::create_session))
        .route("/api/sessions/summary", get(session::session_summary))
        .route(
            "/api/sessions/:id",
            get(session::get_session).delete(session::delete_session),
        )
        .route("/api/sessions/:id/answers", post(session::submit_answer));

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .merge(quiz_api)
        .merge(session_api)
        .with_state(state)
}
