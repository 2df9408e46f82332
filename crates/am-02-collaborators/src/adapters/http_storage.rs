//! IPFS pinning-service client.
//!
//! Writes go through a Pinata-compatible pinning API
//! (`/pinning/pinJSONToIPFS`, `/pinning/pinFileToIPFS`); reads go through a
//! public IPFS gateway. Every request is bounded by the configured timeout.

use crate::domain::{CollaboratorError, EvidenceFile, StoredContent};
use crate::ports::outbound::EvidenceStorage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

const COLLABORATOR: &str = "ipfs";

/// Pinning API and gateway settings.
#[derive(Clone)]
pub struct IpfsConfig {
    pub api_url: String,
    pub gateway_url: String,
    /// Bearer token for the pinning API. Reads work without it.
    pub jwt: Option<String>,
    pub timeout: Duration,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://gateway.pinata.cloud/ipfs".to_string(),
            jwt: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for IpfsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpfsConfig")
            .field("api_url", &self.api_url)
            .field("gateway_url", &self.gateway_url)
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
    #[serde(default)]
    pin_size: u64,
}

/// HTTP evidence storage over a pinning service.
pub struct HttpEvidenceStorage {
    client: Client,
    config: IpfsConfig,
}

impl HttpEvidenceStorage {
    pub fn new(config: IpfsConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CollaboratorError::unavailable(COLLABORATOR, e.to_string()))?;

        info!(
            "[am-02] IPFS storage via {} (pinning {})",
            config.gateway_url,
            if config.jwt.is_some() { "enabled" } else { "disabled" }
        );
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn jwt(&self) -> Result<&str, CollaboratorError> {
        self.config.jwt.as_deref().ok_or_else(|| {
            warn!("[am-02] IPFS pinning requested without credentials (hint: set PINATA_JWT)");
            CollaboratorError::unavailable(COLLABORATOR, "no pinning credentials configured")
        })
    }

    async fn pin(&self, request: reqwest::RequestBuilder) -> Result<StoredContent, CollaboratorError> {
        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status));
        }
        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::rejected(COLLABORATOR, format!("invalid response: {e}")))?;
        debug!("[am-02] Pinned {} ({} bytes)", pinned.ipfs_hash, pinned.pin_size);
        Ok(StoredContent {
            hash: pinned.ipfs_hash,
            size_bytes: pinned.pin_size,
        })
    }
}

#[async_trait]
impl EvidenceStorage for HttpEvidenceStorage {
    async fn store_json(
        &self,
        name: &str,
        content: &serde_json::Value,
    ) -> Result<StoredContent, CollaboratorError> {
        let body = json!({
            "pinataContent": content,
            "pinataMetadata": { "name": name },
        });
        let request = self
            .client
            .post(self.endpoint("pinning/pinJSONToIPFS"))
            .bearer_auth(self.jwt()?)
            .json(&body);
        self.pin(request).await
    }

    async fn store_file(&self, file: &EvidenceFile) -> Result<StoredContent, CollaboratorError> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| CollaboratorError::rejected(COLLABORATOR, e.to_string()))?;
        }
        let metadata = json!({ "name": file.name }).to_string();
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata);

        let request = self
            .client
            .post(self.endpoint("pinning/pinFileToIPFS"))
            .bearer_auth(self.jwt()?)
            .multipart(form);
        self.pin(request).await
    }

    async fn retrieve(&self, hash: &str) -> Result<Vec<u8>, CollaboratorError> {
        let url = format!("{}/{}", self.config.gateway_url.trim_end_matches('/'), hash);
        let response = self.client.get(&url).send().await.map_err(map_transport)?;
        match response.status() {
            status if status.is_success() => response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(map_transport),
            StatusCode::NOT_FOUND => Err(CollaboratorError::ContentNotFound {
                hash: hash.to_string(),
            }),
            status => Err(map_status(status)),
        }
    }

    fn uri_for(&self, hash: &str) -> String {
        format!("{}/{}", self.config.gateway_url.trim_end_matches('/'), hash)
    }
}

fn map_transport(err: reqwest::Error) -> CollaboratorError {
    if err.is_timeout() {
        CollaboratorError::Timeout {
            collaborator: COLLABORATOR,
        }
    } else if err.is_connect() {
        CollaboratorError::unavailable(COLLABORATOR, "cannot reach IPFS endpoint")
    } else {
        CollaboratorError::rejected(COLLABORATOR, err.without_url().to_string())
    }
}

fn map_status(status: StatusCode) -> CollaboratorError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CollaboratorError::unavailable(COLLABORATOR, format!("credentials rejected ({status})"))
        }
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => CollaboratorError::Timeout {
            collaborator: COLLABORATOR,
        },
        _ => CollaboratorError::rejected(COLLABORATOR, status.to_string()),
    }
}
