//! # Domain Layer - Persistence Subsystem
//!
//! Backend-independent pieces: the filter language every backend
//! understands, the error taxonomy, and the joined request shape.

pub mod errors;
pub mod filter;
pub mod joins;

pub use errors::*;
pub use filter::*;
pub use joins::*;

/// A stored entity: a camelCase JSON object.
pub type Document = serde_json::Value;

/// Top-level fields to merge into a stored document.
pub type Patch = serde_json::Map<String, serde_json::Value>;

/// Patch from a JSON object literal. Anything else yields an empty patch.
pub fn patch_of(value: serde_json::Value) -> Patch {
    match value {
        serde_json::Value::Object(fields) => fields,
        _ => Patch::new(),
    }
}
