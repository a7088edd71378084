//! Dosha self-assessment: questionnaire model, scoring, session state machine, and the
//! service/router pair that exposes sessions over HTTP.

pub mod domain;
pub mod profile;
pub mod questionnaire;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod shortcut;

#[cfg(test)]
mod tests;

pub use domain::{AnswerOption, AnswerRecord, Dosha, DoshaPoints, Question, QuestionId};
pub use profile::{DoshaProfile, ProfileCatalog, ProfileCatalogError};
pub use questionnaire::{Questionnaire, QuestionnaireDefinition, QuestionnaireError};
pub use repository::{
    QuestionView, RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView,
};
pub use router::assessment_router;
pub use scoring::DoshaScoreResult;
pub use service::{
    AssessmentReport, AssessmentService, AssessmentServiceError, CommandOutcome,
    CommandResponse, SessionCommand,
};
pub use session::{
    AssessmentPhase, AssessmentSession, BlockReason, NavigationOutcome, SelectionError,
    TransitionError,
};
pub use shortcut::option_index_for_key;
