use serde::{Deserialize, Serialize};

/// Timer cadences for the live and auto agent modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModesConfig {
    /// Status poll interval while live (valid range: 1-3600).
    pub live_poll_interval_secs: u32,
    /// Autonomous prompt interval while auto (valid range: 5-86400).
    pub auto_prompt_interval_secs: u32,
    /// Prompt sent on every auto tick.
    pub auto_prompt: String,
    /// Default number of thoughts to fetch per agent (valid range: 1-500).
    pub thoughts_limit: u32,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            live_poll_interval_secs: 5,
            auto_prompt_interval_secs: 30,
            auto_prompt: "Autonomous task".into(),
            thoughts_limit: 20,
        }
    }
}
