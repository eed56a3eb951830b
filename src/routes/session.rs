use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::quiz_dto::{GenerateQuizPayload, SessionResponse},
    error::Result,
    models::{answer::AnswerSubmission, session::SubmissionOutcome},
    services::session_service::ScoreSummary,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = GenerateQuizPayload,
    responses(
        (status = 201, description = "Quiz generated and session opened", body = SessionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 422, description = "No usable question could be built"),
        (status = 502, description = "Text generation failed")
    )
)]
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (count, chunk_size) = state
        .quiz_service
        .resolve_params(payload.target_count, payload.chunk_size);
    let questions = state
        .quiz_service
        .generate_quiz(&payload.transcript, count, chunk_size)
        .await?;
    let session = state.session_service.create(questions, count).await;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Current session state", body = SessionResponse),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state.session_service.get(id).await?;
    Ok(Json(SessionResponse::from(session)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/answers",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = AnswerSubmission,
    responses(
        (status = 200, description = "Answer recorded and graded", body = SubmissionOutcome),
        (status = 404, description = "Session or question not found"),
        (status = 409, description = "Question already answered")
    )
)]
#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerSubmission>,
) -> Result<Json<SubmissionOutcome>> {
    payload.validate()?;
    let outcome = state.session_service.submit_answer(id, &payload).await?;
    tracing::info!(
        session_id = %id,
        question_id = outcome.question_id,
        score = outcome.score,
        "Answer submitted"
    );
    Ok(Json(outcome))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session ended and discarded"),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.session_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/sessions/summary",
    responses(
        (status = 200, description = "Score across all sessions", body = ScoreSummary)
    )
)]
#[axum::debug_handler]
pub async fn session_summary(State(state): State<AppState>) -> Json<ScoreSummary> {
    Json(state.session_service.summary().await)
}
