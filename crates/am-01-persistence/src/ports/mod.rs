//! # Ports Layer
//!
//! Defines the port traits for the Persistence subsystem.
//!
//! ## Hexagonal Architecture
//!
//! - `outbound.rs` - Driven port every backend implements (`RecordStore`)
//!
//! The typed driving API is `service::Repository`, which consumers hold
//! directly.

pub mod outbound;
