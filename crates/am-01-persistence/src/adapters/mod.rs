//! # Adapters Module
//!
//! `RecordStore` implementations.
//!
//! ## Modules
//!
//! - `memory`: process-local store for tests and single-instance runs
//! - `postgres`: Supabase / Postgres, one JSONB table per collection
//! - `airtable`: Airtable REST API, one table per collection

mod memory;
#[cfg(feature = "airtable")]
mod airtable;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::InMemoryStore;
#[cfg(feature = "airtable")]
pub use airtable::{AirtableConfig, AirtableStore};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresConfig, PostgresStore};

use crate::domain::{Document, Patch};

/// Shallow merge of patch fields into a document.
pub(crate) fn apply_patch(doc: &mut Document, patch: Patch) {
    if let Some(fields) = doc.as_object_mut() {
        fields.extend(patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_patch_overwrites_and_adds() {
        let mut doc = json!({"id": "a", "status": "Available"});
        let patch = json!({"status": "Completed", "completedAt": "2025-01-01T00:00:00Z"});
        apply_patch(&mut doc, patch.as_object().cloned().unwrap());
        assert_eq!(doc["status"], "Completed");
        assert_eq!(doc["id"], "a");
        assert!(doc.get("completedAt").is_some());
    }
}
