//! # Shared Types Crate
//!
//! This crate contains the canonical marketplace entities shared by every
//! subsystem: audit requests, audit owners, audit results, findings, smart
//! contracts, NFTs, IPFS records and developer profiles.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every persisted record shape is defined here.
//! - **One Vocabulary**: `Complexity`, `AuditStatus` and friends are closed
//!   enums. Loose strings coming from storage or collaborators are parsed at
//!   the boundary, never compared ad hoc.
//! - **Document Records**: Each entity implements [`Record`] so persistence
//!   backends can store it as a camelCase JSON document keyed by its id.

pub mod entities;
pub mod errors;
pub mod record;
pub mod status;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use record::{fields, Collection, Record};
pub use status::*;
pub use time::{Clock, FixedClock, SystemClock};

/// Money amounts are exact decimals and currency-agnostic.
pub use rust_decimal::Decimal;
