use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    QuestionnaireRecord, QuestionnaireSubmission, RecordSummary, RespondentViolation, ResponseId,
    ResultView,
};
use super::repository::{QuestionnaireRepository, RepositoryError};
use super::statistics::SurveyStatistics;
use crate::config::SurveyConfig;
use crate::scoring::{normalize, score, ResponseInput, ScoreOutcome, Validation};

/// Service composing respondent intake, scoring, and the repository.
pub struct QuestionnaireService<R> {
    repository: Arc<R>,
    config: SurveyConfig,
}

static RESPONSE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_response_id() -> ResponseId {
    let id = RESPONSE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResponseId(format!("sus-{id:06}"))
}

impl<R> QuestionnaireService<R>
where
    R: QuestionnaireRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: SurveyConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Validate, score, and persist a submission.
    pub fn submit(
        &self,
        submission: QuestionnaireSubmission,
    ) -> Result<QuestionnaireRecord, ServiceError> {
        self.submit_at(submission, Utc::now())
    }

    pub fn submit_at(
        &self,
        submission: QuestionnaireSubmission,
        now: DateTime<Utc>,
    ) -> Result<QuestionnaireRecord, ServiceError> {
        let respondent = submission.respondent.sanitized().map_err(|violation| {
            warn!(%violation, "questionnaire rejected");
            violation
        })?;

        let input = ResponseInput::from_value(submission.responses);
        let score = match score(&input) {
            ScoreOutcome::Scored { score } => score,
            ScoreOutcome::Unscorable { errors } => {
                warn!(errors = errors.len(), "questionnaire responses rejected");
                return Err(ServiceError::InvalidResponses(Validation {
                    is_valid: false,
                    errors,
                }));
            }
        };

        let record = QuestionnaireRecord {
            id: next_response_id(),
            respondent,
            responses: normalize(&input).to_json(),
            sus_score: Some(score.value()),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(id = %stored.id, score = score.value(), "questionnaire accepted");
        Ok(stored)
    }

    pub fn get(&self, id: &ResponseId) -> Result<QuestionnaireRecord, ServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Record plus the result-page view; the score is recomputed when none was stored.
    pub fn result(&self, id: &ResponseId) -> Result<ResultView, ServiceError> {
        Ok(self.get(id)?.result_view())
    }

    pub fn delete(&self, id: &ResponseId) -> Result<(), ServiceError> {
        self.repository.delete(id)?;
        info!(%id, "questionnaire deleted");
        Ok(())
    }

    /// Page through stored responses, newest first.
    pub fn page(
        &self,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> Result<ResponsePage, ServiceError> {
        let pagination = Pagination::clamp(page, per_page, &self.config);
        let total = self.repository.count()?;
        let offset = (pagination.page - 1).saturating_mul(pagination.per_page);
        let records = self.repository.list(offset, pagination.per_page)?;

        Ok(ResponsePage {
            items: records.iter().map(QuestionnaireRecord::summary).collect(),
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            total_pages: total.div_ceil(pagination.per_page),
        })
    }

    pub fn statistics(&self) -> Result<SurveyStatistics, ServiceError> {
        let records = self.repository.all()?;
        Ok(SurveyStatistics::from_records(&records))
    }
}

/// Normalized paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// `page` is at least 1; `per_page` falls back to the default and stays within the max.
    pub fn clamp(page: Option<usize>, per_page: Option<usize>, config: &SurveyConfig) -> Self {
        let max = config.max_page_size.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(config.default_page_size)
                .clamp(1, max),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponsePage {
    pub items: Vec<RecordSummary>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Error raised by the questionnaire service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Respondent(#[from] RespondentViolation),
    #[error("responses are incomplete or out of range")]
    InvalidResponses(Validation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
