//! # Audit Marketplace Telemetry
//!
//! Structured logging for every subsystem.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use am_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AM_LOG_LEVEL` | `info` | Filter directive, falls back to `RUST_LOG` |
//! | `AM_JSON_LOGS` | on in containers | JSON line output |
//! | `AM_SERVICE_NAME` | `audit-marketplace` | Service name on the startup line |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
