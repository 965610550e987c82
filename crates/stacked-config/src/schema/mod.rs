//! Configuration schema types for Stacked.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod endpoints;
mod modes;
mod personas;
mod retry;
mod system;

pub use endpoints::*;
pub use modes::*;
pub use personas::*;
pub use retry::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Stacked.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackedConfig {
    pub endpoints: EndpointsConfig,
    pub network: NetworkConfig,
    pub retry: RetryConfig,
    pub modes: ModesConfig,
    pub playback: PlaybackConfig,
    pub logging: LoggingConfig,
    pub personas: Vec<PersonaConfig>,
}

impl Default for StackedConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            network: NetworkConfig::default(),
            retry: RetryConfig::default(),
            modes: ModesConfig::default(),
            playback: PlaybackConfig::default(),
            logging: LoggingConfig::default(),
            personas: default_personas(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
