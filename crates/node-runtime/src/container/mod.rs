//! # Subsystem Container
//!
//! Configuration plus the wired subsystem instances.

pub mod config;
pub mod subsystems;

pub use config::{BackendKind, ConfigError, NodeConfig};
pub use subsystems::{open_store, SubsystemContainer};
