//! # Repository Service
//!
//! Typed access to any [`RecordStore`].
//!
//! ## Architecture
//!
//! The repository:
//! 1. Converts entities to and from camelCase documents via [`Record`]
//! 2. Turns a missing id into `NotFound` where the caller requires it
//! 3. Follows foreign keys to assemble [`JoinedRequest`]s in batch

mod joins;

use crate::domain::{Document, Filter, Patch, StoreError};
use crate::ports::outbound::RecordStore;
use shared_types::{fields, Record};
use std::sync::Arc;
use tracing::debug;

/// Typed persistence facade shared by every subsystem.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn RecordStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Reachability check for health endpoints.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Insert a new record and return it as stored.
    pub async fn create<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        let doc = to_document(record)?;
        let stored = self.store.insert(R::COLLECTION, record.id(), doc).await?;
        debug!("[am-01] Created {} {}", R::COLLECTION, record.id());
        from_document(stored)
    }

    /// Fetch by id; `None` when absent.
    pub async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.store
            .fetch(R::COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Fetch by id; `NotFound` when absent.
    pub async fn require<R: Record>(&self, id: &str) -> Result<R, StoreError> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))
    }

    /// Merge fields into a record.
    pub async fn update<R: Record>(&self, id: &str, patch: Patch) -> Result<R, StoreError> {
        let doc = self.store.patch(R::COLLECTION, id, patch).await?;
        from_document(doc)
    }

    /// Merge fields only if every guard holds. `None` when a guard fails.
    pub async fn patch_if<R: Record>(
        &self,
        id: &str,
        guards: &[Filter],
        patch: Patch,
    ) -> Result<Option<R>, StoreError> {
        self.store
            .patch_if(R::COLLECTION, id, guards, patch)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Replace a record if present, insert it otherwise.
    pub async fn upsert<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        let doc = to_document(record)?;
        let fields = match &doc {
            Document::Object(map) => map.clone(),
            _ => Patch::new(),
        };

        match self.store.patch(R::COLLECTION, record.id(), fields.clone()).await {
            Ok(stored) => from_document(stored),
            Err(err) if err.is_not_found() => {
                match self.store.insert(R::COLLECTION, record.id(), doc).await {
                    Ok(stored) => from_document(stored),
                    // Lost an insert race; the other writer's row is there now.
                    Err(StoreError::AlreadyExists { .. }) => {
                        let stored = self.store.patch(R::COLLECTION, record.id(), fields).await?;
                        from_document(stored)
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    pub async fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(R::COLLECTION, id).await
    }

    /// All records matching every filter.
    pub async fn list<R: Record>(&self, filters: &[Filter]) -> Result<Vec<R>, StoreError> {
        self.store
            .query(R::COLLECTION, filters)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Records whose `auditRequestId` is one of `request_ids`.
    pub async fn list_for_requests<R: Record>(
        &self,
        request_ids: &[String],
    ) -> Result<Vec<R>, StoreError> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = Filter::any_of(fields::AUDIT_REQUEST_ID, request_ids.iter().cloned());
        self.list(&[filter]).await
    }
}

fn to_document<R: Record>(record: &R) -> Result<Document, StoreError> {
    serde_json::to_value(record).map_err(|e| StoreError::Malformed {
        collection: R::COLLECTION,
        message: e.to_string(),
    })
}

fn from_document<R: Record>(doc: Document) -> Result<R, StoreError> {
    serde_json::from_value(doc).map_err(|e| StoreError::Malformed {
        collection: R::COLLECTION,
        message: e.to_string(),
    })
}
