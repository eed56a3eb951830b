use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::answer::AnswerSubmission;
use crate::models::question::QuestionRecord;
use crate::models::session::{QuizSession, SubmissionOutcome};

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 240;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoreSummary {
    pub sessions: usize,
    pub total_score: u32,
    pub total_questions: usize,
}

/// Process-local quiz sessions. Nothing here outlives the server.
///
/// Sessions older than `ttl` are treated as gone and are dropped on the next
/// insert. When the store is full the oldest session makes room.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<Uuid, QuizSession>>>,
    ttl: Option<Duration>,
    max_sessions: usize,
}

impl Default for SessionService {
    fn default() -> Self {
        Self::with_limits(
            Some(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES)),
            DEFAULT_MAX_SESSIONS,
        )
    }
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Option<Duration>, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self, questions: Vec<QuestionRecord>, requested: usize) -> QuizSession {
        let session = QuizSession::new(questions, requested);
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, Utc::now());
        sessions.insert(session.id, session.clone());
        tracing::info!(session_id = %session.id, questions = session.total(), "Quiz session opened");
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<QuizSession> {
        let now = Utc::now();
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| !self.is_expired(s, now))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))
    }

    pub async fn submit_answer(
        &self,
        id: Uuid,
        submission: &AnswerSubmission,
    ) -> Result<SubmissionOutcome> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| !self.is_expired(s, now))
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))?;
        session.submit(submission)
    }

    /// Ends a session and discards its quiz.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                tracing::info!(session_id = %id, score = session.score, "Quiz session closed");
                Ok(())
            }
            None => Err(Error::NotFound(format!("Session {} not found", id))),
        }
    }

    pub async fn summary(&self) -> ScoreSummary {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        let live: Vec<&QuizSession> = sessions
            .values()
            .filter(|s| !self.is_expired(s, now))
            .collect();
        ScoreSummary {
            sessions: live.len(),
            total_score: live.iter().map(|s| s.score).sum(),
            total_questions: live.iter().map(|s| s.total()).sum(),
        }
    }

    fn is_expired(&self, session: &QuizSession, now: DateTime<Utc>) -> bool {
        self.ttl.is_some_and(|ttl| now - session.created_at >= ttl)
    }

    fn evict(&self, sessions: &mut HashMap<Uuid, QuizSession>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        if sessions.len() < before {
            tracing::info!(expired = before - sessions.len(), "Dropped expired quiz sessions");
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions.values().min_by_key(|s| s.created_at).map(|s| s.id) else {
                break;
            };
            sessions.remove(&oldest);
            tracing::warn!(session_id = %oldest, "Session store full, dropped oldest session");
        }
    }
}
