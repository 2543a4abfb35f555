use super::instance::{Inspection, InspectionId};

/// Storage abstraction so the service can be exercised without a database.
pub trait InspectionRepository: Send + Sync {
    fn insert(&self, inspection: Inspection) -> Result<Inspection, RepositoryError>;
    fn update(&self, inspection: Inspection) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<Inspection>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
