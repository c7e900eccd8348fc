//! HTTP implementation of the status source and replica sink
//!
//! Talks to `<base>/app/status` (GET) and `<base>/app/replicas` (PUT) with
//! JSON bodies. Every request is bounded by the client timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

use crate::client::traits::{ReplicaSink, StatusSource};
use crate::domain::StatusSnapshot;
use crate::error::{ReplicaUpdateError, Result, StatusFetchError};

/// Path of the status endpoint, relative to the base address
pub const STATUS_PATH: &str = "/app/status";

/// Path of the replica control endpoint, relative to the base address
pub const REPLICAS_PATH: &str = "/app/replicas";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpClientConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    cpu: CpuBody,
    replicas: u32,
}

#[derive(Debug, Deserialize)]
struct CpuBody {
    #[serde(rename = "highPriority")]
    high_priority: f64,
}

#[derive(Debug, Serialize)]
struct ReplicasBody {
    replicas: u32,
}

/// reqwest-backed client for the workload's control API
pub struct HttpAppClient {
    client: Client,
    status_url: String,
    replicas_url: String,
    config: HttpClientConfig,
}

impl HttpAppClient {
    /// Create a client rooted at `base_url`
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base = base_url.trim().trim_end_matches('/');

        Ok(Self {
            client,
            status_url: format!("{}{}", base, STATUS_PATH),
            replicas_url: format!("{}{}", base, REPLICAS_PATH),
            config,
        })
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    pub fn replicas_url(&self) -> &str {
        &self.replicas_url
    }

    /// Parse a status body; extra fields are ignored
    fn parse_status(body: &str) -> std::result::Result<StatusSnapshot, StatusFetchError> {
        let parsed: StatusBody = serde_json::from_str(body).map_err(StatusFetchError::Malformed)?;
        Ok(StatusSnapshot::new(parsed.cpu.high_priority, parsed.replicas))
    }
}

#[async_trait]
impl StatusSource for HttpAppClient {
    async fn fetch_status(&self) -> std::result::Result<StatusSnapshot, StatusFetchError> {
        let response = self
            .client
            .get(&self.status_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(StatusFetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusFetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(StatusFetchError::Transport)?;
        Self::parse_status(&body)
    }
}

#[async_trait]
impl ReplicaSink for HttpAppClient {
    async fn apply_replicas(&self, replicas: u32) -> std::result::Result<u16, ReplicaUpdateError> {
        let response = self
            .client
            .put(&self.replicas_url)
            .json(&ReplicasBody { replicas })
            .send()
            .await
            .map_err(ReplicaUpdateError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplicaUpdateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(status.as_u16())
    }
}

impl std::fmt::Debug for HttpAppClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAppClient")
            .field("status_url", &self.status_url)
            .field("replicas_url", &self.replicas_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}
