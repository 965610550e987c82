//! Stacked configuration system.
//!
//! TOML-based configuration for endpoints, retry policy, mode timers,
//! personas, and logging. All sections use `serde(default)` so a partial
//! file (or none at all) works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stacked_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    EndpointsConfig, LogLevel, LoggingConfig, ModesConfig, NetworkConfig, PersonaConfig,
    PlaybackConfig, RetryConfig, StackedConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use stacked_common::ConfigError;

/// Load config from the platform default path, creating it if missing,
/// and validate the result.
pub fn load_config() -> Result<StackedConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate the result.
pub fn load_config_from(path: &Path) -> Result<StackedConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &StackedConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
