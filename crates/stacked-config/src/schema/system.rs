//! System configuration types: logging and the playback sink.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "stacked=trace",
            Self::Debug => "stacked=debug",
            Self::Info => "stacked=info",
            Self::Warn => "stacked=warn",
            Self::Error => "stacked=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// Where the command-line audio sink writes synthesized speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PlaybackConfig {
    /// Directory for `reply-N.wav` files. Unset means payloads are only logged.
    pub output_dir: Option<String>,
}
