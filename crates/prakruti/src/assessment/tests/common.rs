use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::assessment::domain::{AnswerOption, DoshaPoints, Question, QuestionId};
use crate::assessment::repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use crate::assessment::{
    assessment_router, AssessmentService, AssessmentSession, ProfileCatalog, Questionnaire,
};

fn option(label: &str, vata: u32, pitta: u32, kapha: u32) -> AnswerOption {
    AnswerOption {
        label: label.to_string(),
        points: DoshaPoints::new(vata, pitta, kapha),
    }
}

/// Q1: [Vata 3, Pitta 3]; Q2: [Kapha 5, Vata 2 + Pitta 2].
pub(super) fn two_question_questionnaire() -> Questionnaire {
    Questionnaire::new(
        "Two question check",
        vec![
            Question {
                id: QuestionId::new("q1"),
                title: "First".to_string(),
                options: vec![option("Airy", 3, 0, 0), option("Fiery", 0, 3, 0)],
            },
            Question {
                id: QuestionId::new("q2"),
                title: "Second".to_string(),
                options: vec![option("Earthy", 0, 0, 5), option("Mixed", 2, 2, 0)],
            },
        ],
    )
    .expect("valid questionnaire")
}

pub(super) fn three_question_questionnaire() -> Questionnaire {
    Questionnaire::new(
        "Three question check",
        vec![
            Question {
                id: QuestionId::new("frame"),
                title: "Frame".to_string(),
                options: vec![
                    option("Thin", 2, 0, 0),
                    option("Medium", 0, 2, 0),
                    option("Broad", 0, 0, 2),
                ],
            },
            Question {
                id: QuestionId::new("sleep"),
                title: "Sleep".to_string(),
                options: vec![
                    option("Light", 2, 0, 0),
                    option("Moderate", 0, 2, 0),
                    option("Deep", 0, 0, 2),
                ],
            },
            Question {
                id: QuestionId::new("appetite"),
                title: "Appetite".to_string(),
                options: vec![
                    option("Irregular", 2, 0, 0),
                    option("Sharp", 0, 2, 0),
                    option("Steady", 0, 0, 2),
                ],
            },
        ],
    )
    .expect("valid questionnaire")
}

pub(super) fn zero_weight_questionnaire() -> Questionnaire {
    Questionnaire::new(
        "Unweighted",
        vec![Question {
            id: QuestionId::new("only"),
            title: "Only".to_string(),
            options: vec![option("Nothing", 0, 0, 0)],
        }],
    )
    .expect("valid questionnaire")
}

pub(super) fn started_session(questionnaire: Questionnaire) -> AssessmentSession {
    let mut session = AssessmentSession::new(Arc::new(questionnaire));
    session.start().expect("welcome session starts");
    session
}

/// Answer each question in order with the given option indices and walk to results.
pub(super) fn complete_session(questionnaire: Questionnaire, choices: &[usize]) -> AssessmentSession {
    let mut session = started_session(questionnaire);
    for &choice in choices {
        let id = session
            .current_question()
            .expect("question displayed")
            .id
            .clone();
        session.select_option(&id, choice).expect("valid choice");
        session.next();
    }
    session
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.session_id) {
            Some(existing) if existing.revision + 1 == record.revision => {
                *existing = record;
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(
        repository.clone(),
        two_question_questionnaire(),
        ProfileCatalog::standard(),
    );
    (service, repository)
}

pub(super) fn router_with_service(
    service: AssessmentService<MemoryRepository>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
