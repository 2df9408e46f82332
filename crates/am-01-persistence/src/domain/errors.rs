//! # Domain Errors
//!
//! Error types for the Persistence subsystem.
//!
//! ## Design Principles
//!
//! - "No matching rows" is never an error; queries return an empty list.
//! - An unreachable or unconfigured backend is distinguished from a
//!   failing operation so callers can degrade or fail loudly as appropriate.
//! - Messages never carry credentials.

use shared_types::Collection;
use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id in the collection.
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// A record with this id already exists.
    #[error("{collection} record already exists: {id}")]
    AlreadyExists { collection: Collection, id: String },

    /// Backend misconfigured or unreachable.
    #[error("{backend} backend unavailable: {reason} (hint: {hint})")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
        hint: String,
    },

    /// The backend rejected or failed an operation.
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    /// A stored document does not decode into its entity.
    #[error("malformed {collection} document: {message}")]
    Malformed {
        collection: Collection,
        message: String,
    },
}

impl StoreError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn unavailable(
        backend: &'static str,
        reason: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::BackendUnavailable {
            backend,
            reason: reason.into(),
            hint: hint.into(),
        }
    }

    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_collection() {
        let err = StoreError::not_found(Collection::AuditOwners, "own-9");
        assert_eq!(err.to_string(), "audit_owners record not found: own-9");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unavailable_carries_hint() {
        let err = StoreError::unavailable("postgres", "connection refused", "set DATABASE_URL");
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("set DATABASE_URL"));
    }
}
