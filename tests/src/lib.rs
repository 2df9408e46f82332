//! # Audit Marketplace Test Suite
//!
//! Unified test crate for behaviour that spans subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs           # Marketplace harness over in-memory adapters
//! └── flows/
//!     ├── lifecycle.rs      # submit → accept → start → findings → complete
//!     ├── acceptance_race.rs# concurrent claims and claim/cancel interleavings
//!     └── gateway.rs        # the same flow over HTTP with the runtime wiring
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p am-tests
//! cargo test -p am-tests flows::acceptance_race::
//! ```

pub mod fixtures;
pub mod flows;
