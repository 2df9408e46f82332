//! # Domain Layer - External Collaborators
//!
//! Call contracts shared by every collaborator adapter.

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
