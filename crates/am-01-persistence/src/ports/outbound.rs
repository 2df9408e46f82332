//! # Outbound Ports (Driven Ports)
//!
//! The document-level contract each persistence backend implements.
//!
//! Production: `PostgresStore` (Supabase), `AirtableStore`
//! Testing / single instance: `InMemoryStore`

use crate::domain::{Document, Filter, Patch, StoreError};
use async_trait::async_trait;
use shared_types::Collection;

/// Abstract interface for document persistence.
///
/// Every call is an I/O suspension point. Implementations hold no lock
/// across an await.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and errors.
    fn backend_name(&self) -> &'static str;

    /// Check the backend is reachable and configured.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a new document.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: a document with this id is stored
    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        doc: Document,
    ) -> Result<Document, StoreError>;

    /// Fetch a document by id. `Ok(None)` when absent.
    async fn fetch(&self, collection: Collection, id: &str)
        -> Result<Option<Document>, StoreError>;

    /// Merge top-level fields into a stored document and return the result.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no document with this id
    async fn patch(
        &self,
        collection: Collection,
        id: &str,
        patch: Patch,
    ) -> Result<Document, StoreError>;

    /// Merge fields only if the stored document satisfies every guard.
    ///
    /// Returns `Ok(None)` when a guard fails; the document is untouched.
    /// This is the compare-and-swap used to close check-then-act races.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no document with this id
    async fn patch_if(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Patch,
    ) -> Result<Option<Document>, StoreError>;

    /// Delete a document.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no document with this id
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// All documents matching every filter. Empty is not an error.
    async fn query(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError>;
}
