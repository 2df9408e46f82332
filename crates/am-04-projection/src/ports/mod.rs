//! # Ports Layer
//!
//! Read-side driving port. Driven dependencies are the persistence
//! `Repository` and the am-02 `EvidenceStorage`.

pub mod inbound;
