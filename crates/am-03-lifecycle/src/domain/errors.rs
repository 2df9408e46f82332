//! # Domain Errors
//!
//! The lifecycle error taxonomy.
//!
//! | Variant | Meaning | Boundary status |
//! |---------|---------|-----------------|
//! | `Validation` | missing or malformed input | 400 |
//! | `NotFound` | referenced entity absent | 404 |
//! | `State` | operation illegal in the current lifecycle state | 409 |
//! | `BackendUnavailable` | persistence misconfigured or unreachable | 503 |
//! | `Upstream` | a collaborator or a later write failed | 500 |
//! | `Persistence` | a store operation failed before anything was written | 500 |
//!
//! `Upstream` lists every id already written so a partial failure can be
//! reconciled.

use am_01_persistence::StoreError;
use am_02_collaborators::CollaboratorError;
use shared_types::Collection;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    State(String),

    #[error("persistence backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("{collaborator} failed: {message}{}", created_suffix(.created))]
    Upstream {
        collaborator: String,
        message: String,
        created: Vec<String>,
    },

    #[error("persistence failure: {0}")]
    Persistence(String),
}

fn created_suffix(created: &[String]) -> String {
    if created.is_empty() {
        String::new()
    } else {
        format!(" (already written: {})", created.join(", "))
    }
}

impl LifecycleError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// A collaborator call failed after `created` ids were written.
    pub fn upstream(err: &CollaboratorError, created: &[String]) -> Self {
        Self::Upstream {
            collaborator: err.collaborator().to_string(),
            message: err.to_string(),
            created: created.to_vec(),
        }
    }

    /// A store write failed after `created` ids were written.
    pub fn partial_write(err: &StoreError, backend: &str, created: &[String]) -> Self {
        Self::Upstream {
            collaborator: format!("persistence ({backend})"),
            message: err.to_string(),
            created: created.to_vec(),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => Self::NotFound {
                entity: entity_name(collection),
                id,
            },
            StoreError::BackendUnavailable { .. } => Self::BackendUnavailable(err.to_string()),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Singular entity name for messages.
pub fn entity_name(collection: Collection) -> &'static str {
    match collection {
        Collection::AuditRequests => "audit request",
        Collection::AuditOwners => "audit owner",
        Collection::AuditResults => "audit result",
        Collection::Findings => "finding",
        Collection::SmartContracts => "smart contract",
        Collection::Nfts => "nft",
        Collection::IpfsRecords => "ipfs record",
        Collection::Developers => "developer",
    }
}
