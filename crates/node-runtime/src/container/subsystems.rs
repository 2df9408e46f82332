//! # Subsystem Container
//!
//! Holds every subsystem instance and the adapters behind their ports.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Persistence backend (memory | postgres | airtable)
//! Level 1: Collaborators (evidence storage, minter, payments, estimation)
//! Level 2: Lifecycle service, query service
//! Level 3: API gateway state
//! ```

use std::sync::Arc;

use tracing::{info, instrument, warn};

use am_01_persistence::{
    AirtableConfig, AirtableStore, InMemoryStore, PostgresConfig, PostgresStore, RecordStore,
    Repository, StoreError,
};
use am_02_collaborators::{
    EvidenceStorage, HeuristicCostEstimator, HttpEvidenceStorage, InMemoryEvidenceStorage,
    IpfsConfig, SimulatedNftMinter, StaticRepositoryAnalyzer, StubPaymentGateway,
};
use am_03_lifecycle::{AuditLifecycleService, LifecycleDependencies};
use am_04_projection::{MarketplaceQueries, QueryDependencies};
use am_06_api_gateway::AppState;
use shared_types::{Clock, SystemClock};

use crate::container::config::{BackendConfig, BackendKind, CollaboratorConfig, NodeConfig};

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub repository: Repository,
    pub lifecycle: Arc<AuditLifecycleService>,
    pub queries: Arc<MarketplaceQueries>,
}

impl SubsystemContainer {
    /// Open the backend and wire every subsystem.
    ///
    /// ## Errors
    ///
    /// - `BackendUnavailable`: the selected backend lacks credentials or
    ///   cannot be reached
    #[instrument(skip_all, fields(backend = %config.backend.kind))]
    pub async fn new(config: NodeConfig) -> anyhow::Result<Self> {
        let store = open_store(&config.backend, &config.collaborators).await?;
        Self::with_store(config, store)
    }

    /// Wire every subsystem over an already opened store.
    pub fn with_store(
        config: NodeConfig,
        store: Arc<dyn RecordStore>,
    ) -> anyhow::Result<Self> {
        let repository = Repository::new(store);
        let storage = evidence_storage(&config.collaborators)?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let lifecycle = Arc::new(AuditLifecycleService::new(LifecycleDependencies {
            repository: repository.clone(),
            storage: Arc::clone(&storage),
            minter: Arc::new(SimulatedNftMinter::new()),
            payments: Arc::new(StubPaymentGateway::new()),
            analyzer: Arc::new(StaticRepositoryAnalyzer::default()),
            estimator: Arc::new(HeuristicCostEstimator::default()),
            clock: Arc::clone(&clock),
        }));
        let queries = Arc::new(MarketplaceQueries::new(QueryDependencies {
            repository: repository.clone(),
            storage,
            clock,
        }));

        info!(
            "Subsystems wired (backend={}, evidence={})",
            repository.backend_name(),
            if config.collaborators.ipfs.is_configured() { "ipfs" } else { "memory" }
        );

        Ok(Self {
            config,
            repository,
            lifecycle,
            queries,
        })
    }

    /// Handler state for the gateway router.
    pub fn app_state(&self) -> AppState {
        AppState {
            lifecycle: self.lifecycle.clone(),
            queries: self.queries.clone(),
            repository: self.repository.clone(),
        }
    }
}

/// Open the configured persistence backend.
pub async fn open_store(
    backend: &BackendConfig,
    collaborators: &CollaboratorConfig,
) -> Result<Arc<dyn RecordStore>, StoreError> {
    match backend.kind {
        BackendKind::Memory => {
            warn!("In-memory backend selected; data is lost on restart and not shared between instances");
            Ok(Arc::new(InMemoryStore::new()))
        }
        BackendKind::Postgres => {
            let mut pg = PostgresConfig::new(backend.postgres.url.clone().unwrap_or_default());
            pg.max_connections = backend.postgres.max_connections;
            pg.acquire_timeout = collaborators.timeout;
            let store = PostgresStore::connect(&pg).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        BackendKind::Airtable => {
            let mut at = AirtableConfig::new(
                backend.airtable.api_key.clone().unwrap_or_default(),
                backend.airtable.base_id.clone().unwrap_or_default(),
            );
            at.api_url = backend.airtable.api_url.clone();
            at.timeout = collaborators.timeout;
            Ok(Arc::new(AirtableStore::new(at)?))
        }
    }
}

fn evidence_storage(
    collaborators: &CollaboratorConfig,
) -> anyhow::Result<Arc<dyn EvidenceStorage>> {
    let ipfs = &collaborators.ipfs;
    if !ipfs.is_configured() {
        return Ok(Arc::new(InMemoryEvidenceStorage::new()));
    }

    let defaults = IpfsConfig::default();
    let config = IpfsConfig {
        api_url: ipfs.api_url.clone().unwrap_or(defaults.api_url),
        gateway_url: ipfs.gateway_url.clone().unwrap_or(defaults.gateway_url),
        jwt: ipfs.jwt.clone(),
        timeout: collaborators.timeout,
    };
    Ok(Arc::new(HttpEvidenceStorage::new(config)?))
}
