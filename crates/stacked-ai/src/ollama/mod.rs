//! Chat-completion client for the Ollama-backed `/chat` service.
//!
//! Implements [`TextGenerator`](crate::TextGenerator) with bounded
//! retries, exponential backoff, and `Retry-After` handling.

mod api;
mod client;
mod config;

pub use client::GenerationClient;
pub use config::ChatConfig;
