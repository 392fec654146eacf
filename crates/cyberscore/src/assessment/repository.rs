use super::domain::{Entite, EntiteId, Evaluation, NewEvaluation};

/// Lookup of assessed organizations. Registration and authentication live
/// outside this boundary; the service only reads.
pub trait EntiteRepository: Send + Sync {
    fn fetch(&self, id: &EntiteId) -> Result<Option<Entite>, RepositoryError>;
    /// All entities ordered by name, optionally excluding one id.
    fn list(&self, excluding: Option<&EntiteId>) -> Result<Vec<Entite>, RepositoryError>;
}

/// Storage abstraction for evaluations so the service module can be
/// exercised in isolation.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: NewEvaluation) -> Result<Evaluation, RepositoryError>;
    /// Most recent evaluation for an entity, if any.
    fn latest(&self, entite_id: &EntiteId) -> Result<Option<Evaluation>, RepositoryError>;
    /// Full history for an entity, newest first.
    fn history(&self, entite_id: &EntiteId) -> Result<Vec<Evaluation>, RepositoryError>;
    /// Every evaluation owned by an entity of the given sector, excluding
    /// the requesting entity's own rows.
    fn for_sector(
        &self,
        secteur: &str,
        excluding: &EntiteId,
    ) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
