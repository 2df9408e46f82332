//! # Statistics Aggregator (am-05)
//!
//! Pure reductions over records already loaded into memory. No I/O, no
//! streaming: callers fetch the full set and hand it over.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Empty input yields zero totals and a zero average | `domain/marketplace.rs` |
//! | 2 | `sum(byStatus) == total` | `domain/marketplace.rs` |
//! | 3 | Auditor earnings count completed audits only | `domain/auditor.rs` |

#![warn(clippy::all)]

pub mod domain;

pub use domain::auditor::{auditor_summary, AuditorSummary};
pub use domain::marketplace::{compute_stats, MarketplaceStats};
pub use domain::severity::severity_totals;
