use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::question::QuestionRecord;
use crate::models::session::{AnswerState, QuizSession};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateQuizPayload {
    #[validate(length(min = 1))]
    pub transcript: String,
    #[validate(range(min = 1))]
    pub target_count: Option<usize>,
    #[validate(range(min = 1))]
    pub chunk_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateQuizResponse {
    pub questions: Vec<QuestionRecord>,
    pub requested: usize,
    pub produced: usize,
    /// Fewer questions than requested could be built.
    pub partial: bool,
}

impl GenerateQuizResponse {
    pub fn new(questions: Vec<QuestionRecord>, requested: usize) -> Self {
        let produced = questions.len();
        Self {
            questions,
            requested,
            produced,
            partial: produced < requested,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GradePayload {
    pub question: QuestionRecord,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScorePayload {
    pub questions: Vec<QuestionRecord>,
    pub answers: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub score: u32,
    pub graded: u32,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub questions: Vec<QuestionRecord>,
    pub answers: Vec<Option<String>>,
    pub states: Vec<AnswerState>,
    pub submitted: Vec<bool>,
    pub score: u32,
    pub total: usize,
    pub complete: bool,
    pub partial: bool,
}

impl From<QuizSession> for SessionResponse {
    fn from(session: QuizSession) -> Self {
        let total = session.total();
        Self {
            id: session.id,
            created_at: session.created_at,
            submitted: session.submitted(),
            complete: session.is_complete(),
            partial: total < session.requested,
            answers: session.answers,
            states: session.states,
            questions: session.questions,
            score: session.score,
            total,
        }
    }
}
