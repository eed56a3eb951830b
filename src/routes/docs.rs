use axum::Json;
use utoipa::OpenApi;

use crate::dto::quiz_dto::{
    GenerateQuizPayload, GenerateQuizResponse, GradePayload, ScorePayload, ScoreResponse,
    SessionResponse,
};
use crate::models::answer::{AnswerSubmission, Verdict};
use crate::models::question::{QuestionKind, QuestionRecord};
use crate::models::session::{AnswerState, SubmissionOutcome};
use crate::services::session_service::ScoreSummary;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::quiz::generate_quiz,
        crate::routes::quiz::grade_answer,
        crate::routes::quiz::score_quiz,
        crate::routes::session::create_session,
        crate::routes::session::get_session,
        crate::routes::session::submit_answer,
        crate::routes::session::delete_session,
        crate::routes::session::session_summary,
    ),
    components(schemas(
        QuestionRecord,
        QuestionKind,
        AnswerSubmission,
        Verdict,
        AnswerState,
        SubmissionOutcome,
        GenerateQuizPayload,
        GenerateQuizResponse,
        GradePayload,
        ScorePayload,
        ScoreResponse,
        SessionResponse,
        ScoreSummary,
    )),
    tags((name = "videoquiz", description = "Transcript quiz generation and grading"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
