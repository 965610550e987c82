//! Endpoint and network validation.

use super::helpers::{validate_http_url, validate_range};
use crate::schema::StackedConfig;

pub(super) fn validate_endpoints(errors: &mut Vec<String>, config: &StackedConfig) {
    validate_http_url(errors, "endpoints.chat_url", &config.endpoints.chat_url);
    validate_http_url(errors, "endpoints.tts_url", &config.endpoints.tts_url);
    validate_http_url(errors, "endpoints.agents_url", &config.endpoints.agents_url);
}

pub(super) fn validate_network(errors: &mut Vec<String>, config: &StackedConfig) {
    validate_range(
        errors,
        "network.request_timeout_secs",
        config.network.request_timeout_secs,
        1,
        300,
    );
}
