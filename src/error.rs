use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Text generation failed: {0}")]
    GenerationFailed(String),

    #[error("Could not build a quiz from the generated text")]
    EmptyQuiz,

    #[error("Question {0} has no correct answer to grade against")]
    UngradableQuestion(u32),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::GenerationFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Text generation failed: {}", msg),
            ),
            err @ Error::EmptyQuiz => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            err @ Error::UngradableQuestion(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
