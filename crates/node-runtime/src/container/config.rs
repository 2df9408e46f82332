//! # Node Configuration
//!
//! Unified configuration for the backend, collaborators and the gateway.
//!
//! Values come from an optional JSON file (`AM_CONFIG_FILE`), then
//! environment variables override individual fields.
//!
//! ## Security Requirements
//!
//! - Database URLs, API keys and JWTs never appear in `Debug` output
//! - Missing credentials for the selected backend surface at connect time
//!   as `BackendUnavailable` with a hint naming the variables to set

use am_06_api_gateway::GatewayConfig;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub backend: BackendConfig,
    pub collaborators: CollaboratorConfig,
    pub gateway: GatewayConfig,
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// `AM_CONFIG_FILE` if set, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("AM_CONFIG_FILE") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::File(format!("{}: {e}", path.display())))
    }

    /// Override fields from an arbitrary variable source.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(kind) = var("AM_BACKEND") {
            self.backend.kind = parse("AM_BACKEND", &kind)?;
        }
        if let Some(url) = var("DATABASE_URL").or_else(|| var("SUPABASE_DB_URL")) {
            self.backend.postgres.url = Some(url);
        }
        if let Some(max) = var("AM_DB_MAX_CONNECTIONS") {
            self.backend.postgres.max_connections = parse("AM_DB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(key) = var("AIRTABLE_API_KEY") {
            self.backend.airtable.api_key = Some(key);
        }
        if let Some(base) = var("AIRTABLE_BASE_ID") {
            self.backend.airtable.base_id = Some(base);
        }
        if let Some(url) = var("AIRTABLE_API_URL") {
            self.backend.airtable.api_url = url;
        }

        if let Some(host) = var("AM_HTTP_HOST") {
            self.gateway.http.host = parse("AM_HTTP_HOST", &host)?;
        }
        if let Some(port) = var("AM_HTTP_PORT") {
            self.gateway.http.port = parse("AM_HTTP_PORT", &port)?;
        }

        if let Some(url) = var("IPFS_API_URL") {
            self.collaborators.ipfs.api_url = Some(url);
        }
        if let Some(url) = var("IPFS_GATEWAY_URL") {
            self.collaborators.ipfs.gateway_url = Some(url);
        }
        if let Some(jwt) = var("PINATA_JWT") {
            self.collaborators.ipfs.jwt = Some(jwt);
        }
        if let Some(timeout) = var("AM_COLLABORATOR_TIMEOUT") {
            self.collaborators.timeout = humantime::parse_duration(&timeout).map_err(|e| {
                ConfigError::InvalidValue {
                    var: "AM_COLLABORATOR_TIMEOUT",
                    value: timeout.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.postgres.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "postgres max_connections cannot be 0".into(),
            ));
        }
        if self.collaborators.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "collaborator timeout cannot be 0".into(),
            ));
        }
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Which persistence backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local; tests and single-instance deployments only.
    #[default]
    Memory,
    Postgres,
    Airtable,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "postgres" | "supabase" => Ok(Self::Postgres),
            "airtable" => Ok(Self::Airtable),
            other => Err(format!("unknown backend '{other}' (memory, postgres, airtable)")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
            Self::Airtable => "airtable",
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub postgres: PostgresSettings,
    pub airtable: AirtableSettings,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AirtableSettings {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub api_url: String,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_id: None,
            api_url: "https://api.airtable.com".to_string(),
        }
    }
}

impl fmt::Debug for AirtableSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_id", &self.base_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    pub ipfs: IpfsSettings,
    /// Bound on every outbound call.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            ipfs: IpfsSettings::default(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Pinning service settings. With none of them set, evidence is kept in
/// process memory.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct IpfsSettings {
    pub api_url: Option<String>,
    pub gateway_url: Option<String>,
    pub jwt: Option<String>,
}

impl IpfsSettings {
    pub fn is_configured(&self) -> bool {
        self.api_url.is_some() || self.gateway_url.is_some() || self.jwt.is_some()
    }
}

impl fmt::Debug for IpfsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpfsSettings")
            .field("api_url", &self.api_url)
            .field("gateway_url", &self.gateway_url)
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("cannot read config file {0}")]
    File(String),
}
