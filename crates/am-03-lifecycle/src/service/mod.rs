//! # Audit Lifecycle Service
//!
//! The main service implementing `AuditLifecycleApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns every status transition of audit requests and owners
//! 2. Closes the acceptance race with a conditional update on the request
//!    before the owner row is written
//! 3. Reports partial failures with the ids already written
//! 4. Uses dependency injection for persistence, collaborators and time

mod accept;
mod api;
mod findings;
mod profile;
mod results;
mod submit;

use am_01_persistence::{Patch, Repository};
use am_02_collaborators::{
    CostEstimator, EvidenceStorage, NftMinter, PaymentGateway, RepositoryAnalyzer,
};
use chrono::{DateTime, Utc};
use shared_types::{fields, Clock};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Dependencies for AuditLifecycleService
pub struct LifecycleDependencies {
    pub repository: Repository,
    pub storage: Arc<dyn EvidenceStorage>,
    pub minter: Arc<dyn NftMinter>,
    pub payments: Arc<dyn PaymentGateway>,
    pub analyzer: Arc<dyn RepositoryAnalyzer>,
    pub estimator: Arc<dyn CostEstimator>,
    pub clock: Arc<dyn Clock>,
}

/// The Audit Lifecycle Service.
pub struct AuditLifecycleService {
    pub(crate) repository: Repository,
    pub(crate) storage: Arc<dyn EvidenceStorage>,
    pub(crate) minter: Arc<dyn NftMinter>,
    pub(crate) payments: Arc<dyn PaymentGateway>,
    pub(crate) analyzer: Arc<dyn RepositoryAnalyzer>,
    pub(crate) estimator: Arc<dyn CostEstimator>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl AuditLifecycleService {
    pub fn new(deps: LifecycleDependencies) -> Self {
        Self {
            repository: deps.repository,
            storage: deps.storage,
            minter: deps.minter,
            payments: deps.payments,
            analyzer: deps.analyzer,
            estimator: deps.estimator,
            clock: deps.clock,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Best-effort profile refresh after a mutation.
    ///
    /// The profile is derived data; a failure here must not fail the
    /// operation that already succeeded.
    pub(crate) async fn refresh_profile_quietly(&self, wallet: &str) {
        if let Err(e) = self.refresh_profile(wallet).await {
            warn!("[am-03] Developer profile refresh failed for {}: {}", wallet, e);
        }
    }
}

/// New record id with a readable prefix.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Patch fields plus `updatedAt`.
pub(crate) fn touched(mut patch: Patch, now: DateTime<Utc>) -> Patch {
    patch.insert(fields::UPDATED_AT.to_string(), serde_json::json!(now));
    patch
}
