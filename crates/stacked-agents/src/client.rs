//! HTTP client for the agent service, and the trait the poller reads through.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::protocol::{AgentNotification, AgentStatus, HealthStatus, Thought};

#[derive(Debug, thiserror::Error)]
pub enum AgentServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Read/trigger access to the agent service.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    async fn agents(&self) -> Result<Vec<AgentStatus>, AgentServiceError>;

    async fn notifications(&self) -> Result<Vec<AgentNotification>, AgentServiceError>;

    async fn thoughts(&self, agent_id: &str, limit: u32) -> Result<Vec<Thought>, AgentServiceError>;

    async fn trigger(&self, agent_id: &str) -> Result<(), AgentServiceError>;
}

/// Connection settings for the agent service.
#[derive(Debug, Clone)]
pub struct AgentServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl AgentServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed [`AgentDirectory`].
pub struct AgentServiceClient {
    base_url: String,
    http: reqwest::Client,
}

impl AgentServiceClient {
    pub fn new(config: AgentServiceConfig) -> Result<Self, AgentServiceError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10).min(config.timeout))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentServiceError::Network(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, AgentServiceError> {
        self.get_json("/health").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AgentServiceError> {
        debug!(path, "agent service GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| AgentServiceError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| AgentServiceError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| AgentServiceError::Parse(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AgentServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(AgentServiceError::Api {
        status: status.as_u16(),
        message: text.chars().take(200).collect(),
    })
}

#[async_trait]
impl AgentDirectory for AgentServiceClient {
    async fn agents(&self) -> Result<Vec<AgentStatus>, AgentServiceError> {
        self.get_json("/agents").await
    }

    async fn notifications(&self) -> Result<Vec<AgentNotification>, AgentServiceError> {
        self.get_json("/notifications").await
    }

    async fn thoughts(&self, agent_id: &str, limit: u32) -> Result<Vec<Thought>, AgentServiceError> {
        let path = format!(
            "/agents/{}/thoughts?limit={limit}",
            urlencoding::encode(agent_id)
        );
        self.get_json(&path).await
    }

    async fn trigger(&self, agent_id: &str) -> Result<(), AgentServiceError> {
        let path = format!("/agents/{}/trigger", urlencoding::encode(agent_id));
        debug!(agent_id, "agent service trigger");
        let response = self
            .http
            .post(self.url(&path))
            .send()
            .await
            .map_err(|e| AgentServiceError::Network(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }
}
