use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Dosha, QuestionId};
use super::profile::{DoshaProfile, ProfileCatalog};
use super::questionnaire::Questionnaire;
use super::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView};
use super::scoring::DoshaScoreResult;
use super::session::{
    AssessmentPhase, AssessmentSession, BlockReason, NavigationOutcome, SelectionError,
    TransitionError,
};

/// Input accepted from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionCommand {
    Start,
    Select {
        question_id: QuestionId,
        option_index: usize,
    },
    Key {
        key: char,
    },
    Next,
    Previous,
    Submit,
    Restart,
}

/// What a command did to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Moved { index: usize },
    Finished,
    Blocked { reason: String },
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub outcome: CommandOutcome,
    pub session: SessionView,
}

/// Score plus the guidance configured for the dominant dosha.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub session_id: SessionId,
    pub phase: AssessmentPhase,
    pub result: DoshaScoreResult,
    pub dominant_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<DoshaProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Service owning the questionnaire, guidance catalog, and session store.
pub struct AssessmentService<R> {
    questionnaire: Arc<Questionnaire>,
    catalog: Arc<ProfileCatalog>,
    repository: Arc<R>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("asm-{id:06}"))
}

impl<R> AssessmentService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, questionnaire: Questionnaire, catalog: ProfileCatalog) -> Self {
        Self {
            questionnaire: Arc::new(questionnaire),
            catalog: Arc::new(catalog),
            repository,
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    /// Create a session and move it straight to the first question.
    pub fn open(&self) -> Result<SessionView, AssessmentServiceError> {
        let mut session = AssessmentSession::new(Arc::clone(&self.questionnaire));
        session.start()?;

        let record = SessionRecord {
            session_id: next_session_id(),
            revision: 0,
            session,
        };
        let stored = self.repository.insert(record)?;
        tracing::info!(session_id = %stored.session_id, "opened dosha assessment");
        Ok(stored.view())
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionView, AssessmentServiceError> {
        Ok(self.load(session_id)?.view())
    }

    /// Apply one command and persist the session if it changed.
    pub fn apply(
        &self,
        session_id: &SessionId,
        command: SessionCommand,
    ) -> Result<CommandResponse, AssessmentServiceError> {
        let mut record = self.load(session_id)?;
        let outcome = apply_command(&mut record.session, command).map_err(|err| {
            tracing::warn!(%session_id, error = %err, "rejected assessment command");
            err
        })?;

        match &outcome {
            CommandOutcome::Finished => {
                if let Some(result) = record.session.result() {
                    tracing::info!(
                        %session_id,
                        dominant = %result.dominant,
                        "assessment reached results"
                    );
                }
            }
            CommandOutcome::Blocked { reason } => {
                tracing::debug!(%session_id, reason = %reason, "navigation blocked");
            }
            _ => {}
        }

        if outcome != CommandOutcome::Unchanged {
            record.revision += 1;
            self.repository.update(record.clone())?;
        }

        Ok(CommandResponse {
            outcome,
            session: record.view(),
        })
    }

    /// Result and guidance, available once the session reached results.
    pub fn report(&self, session_id: &SessionId) -> Result<AssessmentReport, AssessmentServiceError> {
        let record = self.load(session_id)?;
        let session = &record.session;
        let result = *session
            .result()
            .ok_or(AssessmentServiceError::ResultUnavailable(session.phase()))?;

        Ok(AssessmentReport {
            session_id: record.session_id.clone(),
            phase: session.phase(),
            dominant_label: result.dominant.label(),
            profile: self.profile_for(result.dominant),
            result,
            completed_at: session.completed_at(),
        })
    }

    /// Drop a session from the store.
    pub fn close(&self, session_id: &SessionId) -> Result<(), AssessmentServiceError> {
        self.repository.remove(session_id)?;
        tracing::info!(%session_id, "closed dosha assessment");
        Ok(())
    }

    fn profile_for(&self, dosha: Dosha) -> Option<DoshaProfile> {
        self.catalog.get(dosha).cloned()
    }

    fn load(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Drive a session with a single command.
pub fn apply_command(
    session: &mut AssessmentSession,
    command: SessionCommand,
) -> Result<CommandOutcome, AssessmentServiceError> {
    let outcome = match command {
        SessionCommand::Start => {
            session.start()?;
            CommandOutcome::Applied
        }
        SessionCommand::Select {
            question_id,
            option_index,
        } => {
            session.select_option(&question_id, option_index)?;
            CommandOutcome::Applied
        }
        SessionCommand::Key { key } => {
            session.select_shortcut(key)?;
            CommandOutcome::Applied
        }
        SessionCommand::Next => match session.next() {
            NavigationOutcome::Advanced { index } => CommandOutcome::Moved { index },
            NavigationOutcome::Finished(_) => CommandOutcome::Finished,
            NavigationOutcome::Blocked(BlockReason::Incomplete(question_id)) => {
                CommandOutcome::Blocked {
                    reason: format!("question '{question_id}' still needs an answer"),
                }
            }
            NavigationOutcome::Blocked(BlockReason::Unanswered(question_id)) => {
                CommandOutcome::Blocked {
                    reason: format!("answer question '{question_id}' before continuing"),
                }
            }
            NavigationOutcome::Blocked(BlockReason::NotInProgress(phase)) => {
                CommandOutcome::Blocked {
                    reason: format!("assessment is in phase {phase}"),
                }
            }
        },
        SessionCommand::Previous => {
            if session.previous() {
                CommandOutcome::Moved {
                    index: session.current_index(),
                }
            } else {
                CommandOutcome::Unchanged
            }
        }
        SessionCommand::Submit => {
            session.submit()?;
            CommandOutcome::Applied
        }
        SessionCommand::Restart => {
            session.restart();
            CommandOutcome::Applied
        }
    };

    Ok(outcome)
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no result is available while the assessment is in phase {0}")]
    ResultUnavailable(AssessmentPhase),
}
