pub mod config;
pub mod envelope;
pub mod error;

pub use config::{ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, TimeoutConfig};
pub use envelope::ApiResponse;
pub use error::{ApiError, GatewayError};
