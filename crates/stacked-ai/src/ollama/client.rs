//! Chat client struct, single-attempt request, and response parsing.

use crate::retry::{network_error, parse_retry_after};
use crate::{AiError, GenerationRequest};

use super::config::ChatConfig;

/// Chat-completion client for the `/chat` endpoint.
pub struct GenerationClient {
    pub(crate) config: ChatConfig,
    pub(crate) http: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: ChatConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(network_error)?;
        Ok(Self { config, http })
    }

    /// One HTTP round trip, no retries.
    pub(crate) async fn attempt(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let response = self
            .http
            .post(self.config.chat_url())
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: text,
                retry_after,
            });
        }

        let body = response.text().await.map_err(network_error)?;
        parse_response(&body)
    }
}

/// Extract the `response` field from a `/chat` reply body.
pub(crate) fn parse_response(body: &str) -> Result<String, AiError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AiError::Parse(e.to_string()))?;
    json.get("response")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| AiError::Parse("no 'response' field in reply".to_string()))
}
