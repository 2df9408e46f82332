//! # External Collaborators (am-02)
//!
//! Call contracts for everything the lifecycle talks to outside the
//! persistence backend.
//!
//! ## Purpose
//!
//! | Port | Used by | Adapters |
//! |------|---------|----------|
//! | `EvidenceStorage` | submit, complete, verify | `HttpEvidenceStorage`, `InMemoryEvidenceStorage` |
//! | `NftMinter` | submit, complete | `SimulatedNftMinter` |
//! | `PaymentGateway` | submit | `StubPaymentGateway` |
//! | `RepositoryAnalyzer` | estimate | `StaticRepositoryAnalyzer` |
//! | `CostEstimator` | estimate | `HeuristicCostEstimator` |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Every outbound call is bounded by a timeout (default 10s) | `http_storage.rs` |
//! | 2 | Every error names the collaborator that failed | `domain/errors.rs` |
//! | 3 | Credentials never appear in logs or `Debug` output | `http_storage.rs` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! domain/   - CollaboratorError, payload types
//! ports/    - outbound traits
//! adapters/ - HTTP and in-process implementations
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::outbound::{
    CostEstimator, EvidenceStorage, NftMinter, PaymentGateway, RepositoryAnalyzer,
};
