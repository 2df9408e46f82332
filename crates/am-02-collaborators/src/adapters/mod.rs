//! # Adapters Module
//!
//! ## Modules
//!
//! - `memory_storage`: content-addressed evidence store in process memory
//! - `http_storage`: IPFS pinning API + gateway client (feature `http`)
//! - `nft`: simulated minter
//! - `payment`: payment stub
//! - `analysis`: offline repository analyzer and cost estimator

mod analysis;
#[cfg(feature = "http")]
mod http_storage;
mod memory_storage;
mod nft;
mod payment;

pub use analysis::{HeuristicCostEstimator, StaticRepositoryAnalyzer};
#[cfg(feature = "http")]
pub use http_storage::{HttpEvidenceStorage, IpfsConfig};
pub use memory_storage::{content_hash, InMemoryEvidenceStorage};
pub use nft::SimulatedNftMinter;
pub use payment::StubPaymentGateway;
