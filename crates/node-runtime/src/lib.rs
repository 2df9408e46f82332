//! # Node Runtime Library
//!
//! Exposes configuration and wiring for the `node-runtime` binary and for
//! integration tests.
//!
//! ## Startup Sequence
//!
//! 1. Install the log subscriber (`am-telemetry`)
//! 2. Load configuration (file, then environment) and validate it
//! 3. Open the selected persistence backend
//! 4. Wire collaborators, lifecycle and query services
//! 5. Serve the gateway until Ctrl+C or SIGTERM

pub mod container;

pub use container::config;
pub use container::{BackendKind, ConfigError, NodeConfig, SubsystemContainer};
