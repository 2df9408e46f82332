//! # View Assembly (am-04)
//!
//! Joins raw entities into the shapes clients consume and decides who may
//! see which rows.
//!
//! ## Derived Fields
//!
//! | Field | Rule |
//! |-------|------|
//! | `auditPackage` | Deep if Critical or > 14 days; Standard if High or > 7 days; else Quick |
//! | `deadline` | `"Overdue"` past `createdAt + duration`, else ceil of days left (`"1 day"`, `"3 days"`) |
//! | `linesOfCode` | contract-type base × complexity multiplier, floored |
//! | `progress` | 0 open or cancelled, 100 completed, elapsed / duration in 1..=99 otherwise |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Anonymous viewers see only Available rows | `domain/visibility.rs` |
//! | 2 | Auditors additionally see rows they own, and no one else's | `domain/visibility.rs` |
//! | 3 | Listing and dashboard queries degrade to empty data plus an error | `service/api.rs` |
//! | 4 | Derivations are deterministic given "now" | `domain/derivations.rs` |

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::{AuditorDashboard, DeveloperDashboard, MarketplaceQueryApi};
pub use service::{MarketplaceQueries, QueryDependencies};
