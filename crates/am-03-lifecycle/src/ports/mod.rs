//! # Ports Layer
//!
//! Driving port only. Outbound dependencies are the persistence
//! `Repository` and the am-02 collaborator traits.

pub mod inbound;
