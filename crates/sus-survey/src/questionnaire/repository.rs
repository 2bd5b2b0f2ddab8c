use super::domain::{QuestionnaireRecord, ResponseId};

/// Storage abstraction so the service can be exercised without a database.
pub trait QuestionnaireRepository: Send + Sync {
    fn insert(&self, record: QuestionnaireRecord) -> Result<QuestionnaireRecord, RepositoryError>;
    fn fetch(&self, id: &ResponseId) -> Result<Option<QuestionnaireRecord>, RepositoryError>;
    fn delete(&self, id: &ResponseId) -> Result<(), RepositoryError>;
    /// Newest first.
    fn list(&self, offset: usize, limit: usize)
        -> Result<Vec<QuestionnaireRecord>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
    fn all(&self) -> Result<Vec<QuestionnaireRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
