use metrics_exporter_prometheus::PrometheusHandle;
use prakruti::assessment::{
    ProfileCatalog, Questionnaire, RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use prakruti::config::ContentConfig;
use prakruti::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
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
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("session store mutex poisoned".to_string())
}

/// Resolve the questionnaire and guidance catalog, falling back to the built-in content.
pub(crate) fn load_content(
    content: &ContentConfig,
) -> Result<(Questionnaire, ProfileCatalog), AppError> {
    let questionnaire = match &content.questionnaire_path {
        Some(path) => {
            info!(path = %path.display(), "loading questionnaire override");
            Questionnaire::from_path(path)?
        }
        None => Questionnaire::standard(),
    };

    let catalog = match &content.profiles_path {
        Some(path) => {
            info!(path = %path.display(), "loading profile catalog override");
            ProfileCatalog::from_path(path)?
        }
        None => ProfileCatalog::standard(),
    };

    Ok((questionnaire, catalog))
}

/// Parse `0,2,1` style option lists used by the demo command.
pub(crate) fn parse_answers(raw: &str) -> Result<Vec<usize>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|err| format!("'{part}' is not an option index ({err})"))
        })
        .collect()
}
