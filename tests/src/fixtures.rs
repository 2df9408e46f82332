//! Shared harness: every subsystem over in-memory adapters and a fixed clock.

use std::sync::Arc;

use am_01_persistence::{InMemoryStore, Repository};
use am_02_collaborators::{
    HeuristicCostEstimator, InMemoryEvidenceStorage, SimulatedNftMinter,
    StaticRepositoryAnalyzer, StubPaymentGateway,
};
use am_03_lifecycle::{
    AcceptAuditInput, AuditLifecycleService, FindingInput, LifecycleDependencies,
    SubmitAuditInput,
};
use am_04_projection::{MarketplaceQueries, QueryDependencies};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use shared_types::{Complexity, FixedClock};

pub struct Marketplace {
    pub lifecycle: Arc<AuditLifecycleService>,
    pub queries: MarketplaceQueries,
    pub store: Arc<InMemoryStore>,
    pub storage: Arc<InMemoryEvidenceStorage>,
    pub minter: Arc<SimulatedNftMinter>,
    pub clock: Arc<FixedClock>,
}

impl Marketplace {
    pub fn new() -> Self {
        Self::with_minter(SimulatedNftMinter::new())
    }

    pub fn with_minter(minter: SimulatedNftMinter) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let repository = Repository::new(store.clone());
        let storage = Arc::new(InMemoryEvidenceStorage::new());
        let minter = Arc::new(minter);
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap(),
        ));

        let lifecycle = Arc::new(AuditLifecycleService::new(LifecycleDependencies {
            repository: repository.clone(),
            storage: storage.clone(),
            minter: minter.clone(),
            payments: Arc::new(StubPaymentGateway::new()),
            analyzer: Arc::new(StaticRepositoryAnalyzer::default()),
            estimator: Arc::new(HeuristicCostEstimator::default()),
            clock: clock.clone(),
        }));
        let queries = MarketplaceQueries::new(QueryDependencies {
            repository,
            storage: storage.clone(),
            clock: clock.clone(),
        });

        Self {
            lifecycle,
            queries,
            store,
            storage,
            minter,
            clock,
        }
    }
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}

pub fn submission(project: &str, developer: &str) -> SubmitAuditInput {
    SubmitAuditInput {
        project_name: project.into(),
        description: format!("{project} contracts"),
        repository_url: format!("https://github.com/acme/{}", project.to_lowercase()),
        complexity: Some(Complexity::Medium),
        proposed_price: Some(Decimal::new(2000, 0)),
        estimated_duration_days: Some(10),
        auditor_count: Some(1),
        developer_wallet: developer.into(),
        tags: vec!["defi".into()],
        ..Default::default()
    }
}

pub fn acceptance(wallet: &str, price: i64) -> AcceptAuditInput {
    AcceptAuditInput {
        auditor_wallet: wallet.into(),
        auditor_name: format!("Auditor {wallet}"),
        accepted_price: Decimal::new(price, 0),
        estimated_days: 5,
    }
}

pub fn finding(wallet: &str, title: &str, severity: &str) -> FindingInput {
    FindingInput {
        auditor_wallet: wallet.into(),
        title: title.into(),
        description: format!("{title} in the vault"),
        severity: severity.into(),
        category: "security".into(),
        ..Default::default()
    }
}
