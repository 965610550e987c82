//! Full configuration validation.
//!
//! Validates numeric ranges, endpoint URLs, and the persona roster.
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod endpoints;
mod helpers;
mod modes;
mod personas;
mod retry;


use crate::schema::StackedConfig;
use stacked_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &StackedConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    endpoints::validate_endpoints(&mut errors, config);
    endpoints::validate_network(&mut errors, config);
    retry::validate_retry(&mut errors, config);
    modes::validate_modes(&mut errors, config);
    personas::validate_personas(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
