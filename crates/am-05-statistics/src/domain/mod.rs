//! Aggregations, one file per audience.

pub mod auditor;
pub mod marketplace;
pub mod severity;
