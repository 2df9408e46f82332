use am_01_persistence::StoreError;
use thiserror::Error;

/// Failures of single-record queries. Listing queries degrade instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("audit request not found: {0}")]
    NotFound(String),

    #[error("persistence backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<StoreError> for ProjectionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => Self::NotFound(id),
            StoreError::BackendUnavailable { .. } => Self::BackendUnavailable(err.to_string()),
            other => Self::Persistence(other.to_string()),
        }
    }
}
