//! # Persistence Adapter (am-01)
//!
//! The document store behind every marketplace entity.
//!
//! ## Purpose
//!
//! Exposes CRUD and filtered queries over the eight entity collections, plus
//! relationship-following retrieval for audit requests. Backends are
//! interchangeable and selected by configuration:
//!
//! | Backend | Adapter | Conditional update |
//! |---------|---------|--------------------|
//! | In-memory (tests, single instance) | `InMemoryStore` | atomic under one write lock |
//! | Supabase / Postgres | `PostgresStore` | single `UPDATE … WHERE` with row count |
//! | Airtable | `AirtableStore` | read-check-write, best effort |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Missing id on `require`/`update` is `NotFound` | `service/mod.rs` |
//! | 2 | Empty result set is not an error | every `query` impl |
//! | 3 | Unreachable or unconfigured backend is `BackendUnavailable` | adapters |
//! | 4 | A failed guard leaves the document untouched | every `patch_if` impl |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! domain/   - Filter, StoreError, JoinedRequest
//! ports/    - RecordStore (driven port implemented by each backend)
//! adapters/ - memory, postgres, airtable
//! service/  - Repository: typed CRUD and joins over any RecordStore
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryStore;
#[cfg(feature = "airtable")]
pub use adapters::{AirtableConfig, AirtableStore};
#[cfg(feature = "postgres")]
pub use adapters::{PostgresConfig, PostgresStore};
pub use domain::{patch_of, select_owner, Document, Filter, JoinedRequest, Patch, StoreError};
pub use ports::outbound::RecordStore;
pub use service::Repository;
