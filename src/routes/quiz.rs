use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::quiz_dto::{
        GenerateQuizPayload, GenerateQuizResponse, GradePayload, ScorePayload, ScoreResponse,
    },
    error::{Error, Result},
    models::answer::Verdict,
    services::grading_service::GradingService,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/quiz/generate",
    request_body = GenerateQuizPayload,
    responses(
        (status = 200, description = "Quiz generated, possibly with fewer questions than requested", body = GenerateQuizResponse),
        (status = 400, description = "Invalid payload"),
        (status = 422, description = "No usable question could be built"),
        (status = 502, description = "Text generation failed")
    )
)]
#[axum::debug_handler]
pub async fn generate_quiz(
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
    Ok(Json(GenerateQuizResponse::new(questions, count)))
}

#[utoipa::path(
    post,
    path = "/api/quiz/grade",
    request_body = GradePayload,
    responses(
        (status = 200, description = "Verdict for the submitted answer", body = Verdict),
        (status = 422, description = "Question has no correct answer")
    )
)]
#[axum::debug_handler]
pub async fn grade_answer(
    Json(payload): Json<GradePayload>,
) -> Result<Json<Verdict>> {
    let verdict = GradingService::grade(&payload.answer, &payload.question)?;
    Ok(Json(verdict))
}

#[utoipa::path(
    post,
    path = "/api/quiz/score",
    request_body = ScorePayload,
    responses(
        (status = 200, description = "Tally of correct answers", body = ScoreResponse),
        (status = 400, description = "Answers do not line up with questions")
    )
)]
#[axum::debug_handler]
pub async fn score_quiz(
    Json(payload): Json<ScorePayload>,
) -> Result<Json<ScoreResponse>> {
    if payload.answers.len() != payload.questions.len() {
        return Err(Error::BadRequest(format!(
            "Expected {} answers, got {}",
            payload.questions.len(),
            payload.answers.len()
        )));
    }
    let (score, graded) = GradingService::score(&payload.questions, &payload.answers);
    Ok(Json(ScoreResponse {
        score,
        graded,
        total: payload.questions.len(),
    }))
}
