//! Content-addressed evidence storage held in process memory.

use crate::domain::{CollaboratorError, EvidenceFile, StoredContent};
use crate::ports::outbound::EvidenceStorage;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

const COLLABORATOR: &str = "evidence-storage";

/// Evidence store keyed by SHA-256 of the content.
///
/// Identical content always yields the same hash.
#[derive(Default)]
pub struct InMemoryEvidenceStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    should_fail: AtomicBool,
}

impl InMemoryEvidenceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail (tests only).
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Store arbitrary bytes under an explicit hash (tests only).
    pub fn insert_raw(&self, hash: &str, bytes: Vec<u8>) {
        self.blobs.write().insert(hash.to_string(), bytes);
    }

    fn check(&self) -> Result<(), CollaboratorError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::unavailable(COLLABORATOR, "mock failure"));
        }
        Ok(())
    }

    fn put(&self, bytes: Vec<u8>) -> StoredContent {
        let hash = content_hash(&bytes);
        let size_bytes = bytes.len() as u64;
        self.blobs.write().entry(hash.clone()).or_insert(bytes);
        debug!("[am-02] Stored {} bytes as {}", size_bytes, hash);
        StoredContent { hash, size_bytes }
    }
}

/// `sha256-` followed by the hex digest.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("sha256-{}", hex::encode(Sha256::digest(bytes)))
}

#[async_trait]
impl EvidenceStorage for InMemoryEvidenceStorage {
    async fn store_json(
        &self,
        _name: &str,
        content: &serde_json::Value,
    ) -> Result<StoredContent, CollaboratorError> {
        self.check()?;
        let bytes = serde_json::to_vec(content)
            .map_err(|e| CollaboratorError::rejected(COLLABORATOR, e.to_string()))?;
        Ok(self.put(bytes))
    }

    async fn store_file(&self, file: &EvidenceFile) -> Result<StoredContent, CollaboratorError> {
        self.check()?;
        Ok(self.put(file.bytes.clone()))
    }

    async fn retrieve(&self, hash: &str) -> Result<Vec<u8>, CollaboratorError> {
        self.check()?;
        self.blobs
            .read()
            .get(hash)
            .cloned()
            .ok_or_else(|| CollaboratorError::ContentNotFound {
                hash: hash.to_string(),
            })
    }
}
