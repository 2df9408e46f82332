//! # Domain Layer - Audit Lifecycle
//!
//! Error taxonomy, validated inputs and the pure rules the service applies.

pub mod errors;
pub mod inputs;
pub mod rules;

pub use errors::*;
pub use inputs::*;
pub use rules::*;
