//! Questionnaire intake, storage abstraction, result views, and reporting.

pub mod audit;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod statistics;

pub use audit::{
    audit, rescore, AuditIssue, AuditReport, IssueKind, RecordExporter, RecordImportError,
    RecordImporter,
};
pub use domain::{
    DigitalProficiency, Gender, QuestionnaireRecord, QuestionnaireSubmission, RecordSummary,
    Respondent, RespondentViolation, ResponseId, ResultView,
};
pub use repository::{QuestionnaireRepository, RepositoryError};
pub use router::questionnaire_router;
pub use service::{Pagination, QuestionnaireService, ResponsePage, ServiceError};
pub use statistics::{aggregate, AgeGroup, ScoreBucket, SurveyStatistics};

#[cfg(test)]
mod tests;
