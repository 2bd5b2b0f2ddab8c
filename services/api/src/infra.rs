use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use sus_survey::questionnaire::{
    QuestionnaireRecord, QuestionnaireRepository, RepositoryError, ResponseId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store; contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQuestionnaireRepository {
    records: Arc<Mutex<HashMap<ResponseId, QuestionnaireRecord>>>,
}

impl InMemoryQuestionnaireRepository {
    fn newest_first(&self) -> Vec<QuestionnaireRecord> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<QuestionnaireRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records
    }
}

impl QuestionnaireRepository for InMemoryQuestionnaireRepository {
    fn insert(&self, record: QuestionnaireRecord) -> Result<QuestionnaireRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ResponseId) -> Result<Option<QuestionnaireRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ResponseId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(self
            .newest_first()
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.len())
    }

    fn all(&self) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(self.newest_first())
    }
}
