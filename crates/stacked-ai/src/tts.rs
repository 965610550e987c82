//! Text-to-speech client for the `/tts` endpoint.
//!
//! Sends `{text}` and returns the raw audio body. Exactly one attempt:
//! any transport, status, or decoding failure is returned as-is.

use std::time::Duration;

use async_trait::async_trait;
use stacked_common::AudioPayload;
use tracing::{debug, warn};

use crate::retry::network_error;
use crate::{AiError, SpeechSynthesizer};

/// Speech client configuration.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Base URL; requests go to `{base_url}/tts`.
    pub base_url: String,
    pub timeout: Duration,
}

impl SynthesisConfig {
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

    fn tts_url(&self) -> String {
        format!("{}/tts", self.base_url.trim_end_matches('/'))
    }
}

/// Single-attempt speech synthesis client.
pub struct SynthesisClient {
    config: SynthesisConfig,
    http: reqwest::Client,
}

impl SynthesisClient {
    pub fn new(config: SynthesisConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10).min(config.timeout))
            .timeout(config.timeout)
            .build()
            .map_err(network_error)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl SpeechSynthesizer for SynthesisClient {
    async fn synthesize(&self, text: &str) -> Result<AudioPayload, AiError> {
        debug!(chars = text.chars().count(), "tts request");

        let response = self
            .http
            .post(self.config.tts_url())
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.chars().take(200).collect::<String>();
            warn!(status = status.as_u16(), "tts request rejected");
            return Err(AiError::Api {
                status: status.as_u16(),
                message: body,
                retry_after: None,
            });
        }

        let bytes = response.bytes().await.map_err(network_error)?;
        if bytes.is_empty() {
            return Err(AiError::Parse("empty audio body".to_string()));
        }

        debug!(bytes = bytes.len(), "tts audio received");
        Ok(AudioPayload::new(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tts_url_joins_base() {
        assert_eq!(
            SynthesisConfig::new("http://127.0.0.1:5556/").tts_url(),
            "http://127.0.0.1:5556/tts"
        );
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(
            SynthesisConfig::new("http://x").timeout,
            Duration::from_secs(30)
        );
    }
}
