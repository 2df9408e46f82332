use super::apply_patch;
use crate::domain::{matches_all, Document, Filter, Patch, StoreError};
use crate::ports::outbound::RecordStore;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::Collection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

const BACKEND: &str = "memory";

/// In-memory document store.
///
/// Non-durable, process-local state for tests and single-instance
/// deployments. Every operation runs under one lock acquisition, so
/// `patch_if` is a true compare-and-swap here. Never share it across
/// instances.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
    unavailable: AtomicBool,
    /// Writes still allowed per collection before they start failing.
    write_budget: Mutex<HashMap<Collection, usize>>,
}

#[derive(Default)]
struct MemoryState {
    next_seq: u64,
    collections: HashMap<Collection, HashMap<String, Entry>>,
}

struct Entry {
    /// Insertion order, so queries are stable.
    seq: u64,
    doc: Document,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable backend (tests only).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Let `allowed` more writes to `collection` succeed, then fail every
    /// later insert, patch or delete there (tests only).
    pub fn fail_writes_after(&self, collection: Collection, allowed: usize) {
        self.write_budget.lock().insert(collection, allowed);
    }

    /// Remove every write failure set by `fail_writes_after`.
    pub fn clear_write_failures(&self) {
        self.write_budget.lock().clear();
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        self.state
            .read()
            .collections
            .get(&collection)
            .map_or(0, HashMap::len)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(
                BACKEND,
                "store marked unavailable",
                "clear the failure switch",
            ));
        }
        Ok(())
    }

    fn check_writable(&self, collection: Collection) -> Result<(), StoreError> {
        self.check_available()?;
        let mut budget = self.write_budget.lock();
        match budget.get_mut(&collection) {
            Some(0) => Err(StoreError::unavailable(
                BACKEND,
                format!("writes to {collection} marked failing"),
                "clear the write failure switch",
            )),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        doc: Document,
    ) -> Result<Document, StoreError> {
        self.check_writable(collection)?;
        let mut state = self.state.write();
        let seq = state.next_seq;
        let docs = state.collections.entry(collection).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                collection,
                id: id.to_string(),
            });
        }
        docs.insert(
            id.to_string(),
            Entry {
                seq,
                doc: doc.clone(),
            },
        );
        state.next_seq += 1;
        Ok(doc)
    }

    async fn fetch(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        let state = self.state.read();
        Ok(state
            .collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|entry| entry.doc.clone()))
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &str,
        patch: Patch,
    ) -> Result<Document, StoreError> {
        self.check_writable(collection)?;
        let mut state = self.state.write();
        let entry = state
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        apply_patch(&mut entry.doc, patch);
        Ok(entry.doc.clone())
    }

    async fn patch_if(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Patch,
    ) -> Result<Option<Document>, StoreError> {
        self.check_writable(collection)?;
        let mut state = self.state.write();
        let entry = state
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        if !matches_all(guards, &entry.doc) {
            return Ok(None);
        }
        apply_patch(&mut entry.doc, patch);
        Ok(Some(entry.doc.clone()))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.check_writable(collection)?;
        let mut state = self.state.write();
        state
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn query(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        let state = self.state.read();
        let Some(docs) = state.collections.get(&collection) else {
            return Ok(Vec::new());
        };
        let mut hits: Vec<&Entry> = docs
            .values()
            .filter(|entry| matches_all(filters, &entry.doc))
            .collect();
        hits.sort_by_key(|entry| entry.seq);
        Ok(hits.into_iter().map(|entry| entry.doc.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: serde_json::Value) -> Patch {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_fetch_and_duplicate() {
        let store = InMemoryStore::new();
        let doc = json!({"id": "a", "status": "Available"});

        store
            .insert(Collection::AuditRequests, "a", doc.clone())
            .await
            .unwrap();
        assert_eq!(
            store.fetch(Collection::AuditRequests, "a").await.unwrap(),
            Some(doc.clone())
        );

        let dup = store.insert(Collection::AuditRequests, "a", doc).await;
        assert!(matches!(dup, Err(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = InMemoryStore::new();
        assert_eq!(store.fetch(Collection::Findings, "x").await.unwrap(), None);

        let err = store
            .patch(Collection::Findings, "x", Patch::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.delete(Collection::Findings, "x").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_patch_if_guard() {
        let store = InMemoryStore::new();
        store
            .insert(
                Collection::AuditRequests,
                "a",
                json!({"id": "a", "status": "Available"}),
            )
            .await
            .unwrap();

        let guard = [Filter::eq_ignore_case("status", "available")];
        let first = store
            .patch_if(
                Collection::AuditRequests,
                "a",
                &guard,
                patch(json!({"status": "In Progress"})),
            )
            .await
            .unwrap();
        assert_eq!(first.unwrap()["status"], "In Progress");

        // Second claim loses the guard and changes nothing
        let second = store
            .patch_if(
                Collection::AuditRequests,
                "a",
                &guard,
                patch(json!({"status": "Cancelled"})),
            )
            .await
            .unwrap();
        assert!(second.is_none());
        let stored = store.fetch(Collection::AuditRequests, "a").await.unwrap();
        assert_eq!(stored.unwrap()["status"], "In Progress");
    }

    #[tokio::test]
    async fn test_query_preserves_insertion_order() {
        let store = InMemoryStore::new();
        for id in ["z", "a", "m"] {
            store
                .insert(Collection::Findings, id, json!({"id": id, "tags": ["x"]}))
                .await
                .unwrap();
        }
        let docs = store
            .query(Collection::Findings, &[Filter::contains("tags", "x")])
            .await
            .unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_write_failures_are_per_collection() {
        let store = InMemoryStore::new();
        store.fail_writes_after(Collection::AuditOwners, 1);

        store
            .insert(Collection::AuditOwners, "o1", json!({"id": "o1"}))
            .await
            .unwrap();
        let err = store
            .insert(Collection::AuditOwners, "o2", json!({"id": "o2"}))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        let err = store
            .patch(Collection::AuditOwners, "o1", patch(json!({"status": "completed"})))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());

        // Reads and other collections are unaffected
        assert!(store.fetch(Collection::AuditOwners, "o1").await.unwrap().is_some());
        store
            .insert(Collection::AuditResults, "r1", json!({"id": "r1"}))
            .await
            .unwrap();

        store.clear_write_failures();
        store
            .insert(Collection::AuditOwners, "o2", json!({"id": "o2"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unavailable_is_distinct_from_empty() {
        let store = InMemoryStore::new();
        assert!(store.query(Collection::Nfts, &[]).await.unwrap().is_empty());

        store.set_unavailable(true);
        let err = store.query(Collection::Nfts, &[]).await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
