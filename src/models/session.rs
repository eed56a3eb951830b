use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::answer::{AnswerSubmission, Verdict};
use crate::models::question::QuestionRecord;
use crate::services::grading_service::GradingService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerState {
    Unanswered,
    Submitted,
    Graded,
}

/// Per-quiz answer bookkeeping. The grader itself is stateless; the running
/// tally and the one-attempt-per-question rule live here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Question count the quiz was generated for.
    pub requested: usize,
    pub questions: Vec<QuestionRecord>,
    pub answers: Vec<Option<String>>,
    pub states: Vec<AnswerState>,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionOutcome {
    pub question_id: u32,
    pub state: AnswerState,
    /// Absent when the stored question could not be graded.
    pub verdict: Option<Verdict>,
    pub score: u32,
    pub total: usize,
}

impl QuizSession {
    pub fn new(questions: Vec<QuestionRecord>, requested: usize) -> Self {
        let len = questions.len();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            requested,
            questions,
            answers: vec![None; len],
            states: vec![AnswerState::Unanswered; len],
            score: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn submitted(&self) -> Vec<bool> {
        self.states
            .iter()
            .map(|s| *s != AnswerState::Unanswered)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|s| *s != AnswerState::Unanswered)
    }

    pub fn submit(&mut self, submission: &AnswerSubmission) -> Result<SubmissionOutcome> {
        let idx = self
            .questions
            .iter()
            .position(|q| q.id == submission.question_id)
            .ok_or_else(|| {
                Error::NotFound(format!("Question {} not in session", submission.question_id))
            })?;

        if self.states[idx] != AnswerState::Unanswered {
            return Err(Error::Conflict(format!(
                "Question {} has already been answered",
                submission.question_id
            )));
        }

        self.answers[idx] = Some(submission.answer.clone());
        self.states[idx] = AnswerState::Submitted;

        let verdict = match GradingService::grade(&submission.answer, &self.questions[idx]) {
            Ok(verdict) => {
                if verdict.correct {
                    self.score += 1;
                }
                self.states[idx] = AnswerState::Graded;
                Some(verdict)
            }
            Err(Error::UngradableQuestion(id)) => {
                tracing::warn!(session_id = %self.id, question_id = id, "Skipping ungradable question");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(SubmissionOutcome {
            question_id: submission.question_id,
            state: self.states[idx],
            verdict,
            score: self.score,
            total: self.total(),
        })
    }
}
