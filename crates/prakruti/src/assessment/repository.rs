use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::QuestionId;
use super::scoring::DoshaScoreResult;
use super::session::{AssessmentPhase, AssessmentSession};

/// Identifier handed to the client that owns a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored session keyed by its id.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    /// Bumped on every persisted change; starts at 0 on insert.
    pub revision: u64,
    pub session: AssessmentSession,
}

impl SessionRecord {
    pub fn view(&self) -> SessionView {
        let session = &self.session;
        let (answered, total_questions) = session.progress();
        let current_question = session.current_question().map(|question| QuestionView {
            id: question.id.clone(),
            title: question.title.clone(),
            options: question
                .options
                .iter()
                .map(|option| option.label.clone())
                .collect(),
            selected_option: session
                .answer(&question.id)
                .map(|record| record.option_index),
        });

        SessionView {
            session_id: self.session_id.clone(),
            phase: session.phase(),
            phase_label: session.phase().label(),
            current_index: session.current_index(),
            total_questions,
            answered,
            can_advance: current_question
                .as_ref()
                .map(|question| question.selected_option.is_some())
                .unwrap_or(false),
            can_go_back: session.phase() == AssessmentPhase::InProgress
                && session.current_index() > 0,
            current_question,
            result: session.result().copied(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        }
    }
}

/// Storage abstraction so the service can run against any session store.
///
/// `update` is a compare-and-swap: it only succeeds when the incoming
/// `revision` is exactly one past the stored one, and returns
/// `RepositoryError::Conflict` otherwise, so two commands racing on the same
/// session cannot silently drop each other's change.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists or was changed concurrently")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot of a session for rendering. Option weights are not exposed.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub phase: AssessmentPhase,
    pub phase_label: &'static str,
    pub current_index: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub can_advance: bool,
    pub can_go_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DoshaScoreResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub title: String,
    pub options: Vec<String>,
    pub selected_option: Option<usize>,
}
