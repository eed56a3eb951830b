use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A user-chosen option for one question of a quiz session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnswerSubmission {
    #[validate(range(min = 1))]
    pub question_id: u32,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    pub correct: bool,
    /// Only exposed when the submitted answer was wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
