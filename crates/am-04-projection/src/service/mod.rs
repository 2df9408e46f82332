//! # Marketplace Query Service
//!
//! Implements `MarketplaceQueryApi` over the repository's joined reads.

mod api;
mod dashboards;
mod listing;
mod verification;

use am_01_persistence::Repository;
use am_02_collaborators::EvidenceStorage;
use shared_types::Clock;
use std::sync::Arc;

/// Dependencies for MarketplaceQueries
pub struct QueryDependencies {
    pub repository: Repository,
    /// Evidence bundles are fetched from here for verification.
    pub storage: Arc<dyn EvidenceStorage>,
    pub clock: Arc<dyn Clock>,
}

pub struct MarketplaceQueries {
    pub(crate) repository: Repository,
    pub(crate) storage: Arc<dyn EvidenceStorage>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl MarketplaceQueries {
    pub fn new(deps: QueryDependencies) -> Self {
        Self {
            repository: deps.repository,
            storage: deps.storage,
            clock: deps.clock,
        }
    }
}
