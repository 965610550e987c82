//! Generation and speech clients for Stacked.
//!
//! Provides the chat-completion client (bounded retries, exponential
//! backoff with jitter, server-directed retry delays), the single-attempt
//! text-to-speech client, and the persona registry that decides which
//! model and system prompt a request uses.

pub mod ollama;
pub mod persona;
pub mod retry;
pub mod tts;

use std::time::Duration;

use async_trait::async_trait;
use stacked_common::AudioPayload;

pub use ollama::{ChatConfig, GenerationClient};
pub use persona::{Persona, PersonaRegistry};
pub use retry::{RetryPolicy, TransportErrorKind};
pub use tts::{SynthesisClient, SynthesisConfig};

/// Produces a reply for a single prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError>;
}

/// Turns reply text into an audio payload.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioPayload, AiError>;
}

/// One chat-completion call. Serialized as the `/chat` request body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    #[serde(rename = "message")]
    pub prompt: String,
    #[serde(rename = "system")]
    pub system_prompt: String,
}

impl GenerationRequest {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("network error ({kind}): {message}")]
    Network {
        kind: TransportErrorKind,
        message: String,
    },
    #[error("API error: HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },
    #[error("decoding error: {0}")]
    Parse(String),
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<AiError>,
    },
    #[error("unknown error")]
    Unknown,
}

/// What the retry loop should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryHint {
    /// Wait exactly this long, then reissue.
    After(Duration),
    /// Wait for the policy's backoff delay, then reissue.
    Backoff,
    /// Surface the error now.
    Fatal,
}

impl AiError {
    pub fn retry_hint(&self) -> RetryHint {
        match self {
            AiError::Network { kind, .. } if kind.is_retryable() => RetryHint::Backoff,
            AiError::Api {
                retry_after: Some(delay),
                ..
            } => RetryHint::After(*delay),
            _ => RetryHint::Fatal,
        }
    }

    /// HTTP status carried by an API error, looking through exhausted retries.
    pub fn status(&self) -> Option<u16> {
        match self {
            AiError::Api { status, .. } => Some(*status),
            AiError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}
