use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::SurveyConfig;
use crate::questionnaire::domain::{
    DigitalProficiency, Gender, QuestionnaireRecord, QuestionnaireSubmission, Respondent,
    ResponseId,
};
use crate::questionnaire::repository::{QuestionnaireRepository, RepositoryError};
use crate::questionnaire::{questionnaire_router, QuestionnaireService};

pub(super) const MIXED_RESPONSES: [i64; 10] = [4, 2, 5, 1, 3, 3, 4, 2, 5, 1];

pub(super) fn respondent() -> Respondent {
    Respondent {
        name: "Dewi Lestari".to_string(),
        age: 27,
        gender: Gender::Female,
        digital_proficiency: DigitalProficiency::Intermediate,
    }
}

pub(super) fn responses_json(values: [i64; 10]) -> Value {
    let mut map = serde_json::Map::new();
    for (index, value) in values.iter().enumerate() {
        map.insert(format!("q{}", index + 1), json!(value));
    }
    Value::Object(map)
}

pub(super) fn submission() -> QuestionnaireSubmission {
    QuestionnaireSubmission {
        respondent: respondent(),
        responses: responses_json(MIXED_RESPONSES),
    }
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn record(
    id: &str,
    values: [i64; 10],
    sus_score: Option<f64>,
    created_at: DateTime<Utc>,
) -> QuestionnaireRecord {
    QuestionnaireRecord {
        id: ResponseId(id.to_string()),
        respondent: respondent(),
        responses: responses_json(values).to_string(),
        sus_score,
        created_at,
        updated_at: created_at,
    }
}

pub(super) fn survey_config() -> SurveyConfig {
    SurveyConfig {
        default_page_size: 2,
        max_page_size: 3,
    }
}

pub(super) fn build_service() -> (QuestionnaireService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = QuestionnaireService::new(repository.clone(), survey_config());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ResponseId, QuestionnaireRecord>>>,
}

impl MemoryRepository {
    fn sorted(&self) -> Vec<QuestionnaireRecord> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records
    }
}

impl QuestionnaireRepository for MemoryRepository {
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
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(self.sorted().into_iter().skip(offset).take(limit).collect())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").len())
    }

    fn all(&self) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(self.sorted())
    }
}

pub(super) struct ConflictRepository;

impl QuestionnaireRepository for ConflictRepository {
    fn insert(&self, _record: QuestionnaireRecord) -> Result<QuestionnaireRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ResponseId) -> Result<Option<QuestionnaireRecord>, RepositoryError> {
        Ok(None)
    }

    fn delete(&self, _id: &ResponseId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn list(
        &self,
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    fn all(&self) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl QuestionnaireRepository for UnavailableRepository {
    fn insert(&self, _record: QuestionnaireRecord) -> Result<QuestionnaireRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ResponseId) -> Result<Option<QuestionnaireRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ResponseId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(
        &self,
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: QuestionnaireService<MemoryRepository>) -> axum::Router {
    questionnaire_router(Arc::new(service))
}
