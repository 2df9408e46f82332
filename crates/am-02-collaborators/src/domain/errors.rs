//! # Domain Errors
//!
//! Failures of outbound collaborator calls. Every variant names the
//! collaborator so callers can report which one failed.

use thiserror::Error;

/// Errors raised by collaborator adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Not configured or not reachable.
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        collaborator: &'static str,
        reason: String,
    },

    /// The call did not finish within the configured timeout.
    #[error("{collaborator} timed out")]
    Timeout { collaborator: &'static str },

    /// The collaborator answered with a failure.
    #[error("{collaborator} rejected the call: {message}")]
    Rejected {
        collaborator: &'static str,
        message: String,
    },

    /// No content stored under this hash.
    #[error("content not found: {hash}")]
    ContentNotFound { hash: String },

    /// Content exists but is not what the caller expected.
    #[error("invalid content at {hash}: {message}")]
    InvalidContent { hash: String, message: String },
}

impl CollaboratorError {
    pub fn rejected(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            collaborator,
            message: message.into(),
        }
    }

    pub fn unavailable(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator,
            reason: reason.into(),
        }
    }

    /// Which collaborator failed, for error reports.
    pub fn collaborator(&self) -> &'static str {
        match self {
            Self::Unavailable { collaborator, .. }
            | Self::Timeout { collaborator }
            | Self::Rejected { collaborator, .. } => collaborator,
            Self::ContentNotFound { .. } | Self::InvalidContent { .. } => "evidence-storage",
        }
    }
}
