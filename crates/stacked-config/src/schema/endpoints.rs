//! Remote service endpoints and transport settings.

use serde::{Deserialize, Serialize};

/// Base URLs of the three remote services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Chat-completion service (`POST /chat`).
    pub chat_url: String,
    /// Text-to-speech service (`POST /tts`).
    pub tts_url: String,
    /// Autonomous agent service (`/agents`, `/notifications`, `/health`).
    pub agents_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            chat_url: "http://127.0.0.1:5555".into(),
            tts_url: "http://127.0.0.1:5556".into(),
            agents_url: "http://127.0.0.1:5557".into(),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds (valid range: 1-300).
    pub request_timeout_secs: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}
