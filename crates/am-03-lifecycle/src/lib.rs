//! # Audit Lifecycle Engine (am-03)
//!
//! Owns every status transition of an audit request and its owner.
//!
//! ## State Machine
//!
//! ```text
//! submit ──→ [Available] ──accept──→ [In Progress] ──submit results──→ [Completed]
//!                 │                        │
//!                 └────────cancel──────────┴──────→ [Cancelled]
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | At most one active owner per request; concurrent accepts have one winner | `service/accept.rs` |
//! | 2 | Request and owner statuses never skip or reverse | `service/accept.rs`, `service/results.rs` |
//! | 3 | Results are written at most once per request | `service/results.rs` |
//! | 4 | Finding severity is one of `low`, `medium`, `high`, `critical` | `domain/inputs.rs` |
//! | 5 | Partial failures report every id already written | `domain/errors.rs` |
//! | 6 | Developer profiles are derived data; a refresh failure never fails a mutation | `service/mod.rs` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! domain/   - LifecycleError, operation inputs, pure rules
//! ports/    - AuditLifecycleApi (inbound)
//! service/  - AuditLifecycleService, one file per operation group
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::{AuditLifecycleApi, SubmissionEstimate};
pub use service::{AuditLifecycleService, LifecycleDependencies};
