//! Retry policy validation.

use super::helpers::{validate_range, validate_range_f64};
use crate::schema::StackedConfig;

pub(super) fn validate_retry(errors: &mut Vec<String>, config: &StackedConfig) {
    let r = &config.retry;
    validate_range(errors, "retry.max_attempts", r.max_attempts, 1, 10);
    validate_range_f64(errors, "retry.base_delay_secs", r.base_delay_secs, 0.0, 60.0);
    validate_range_f64(errors, "retry.max_delay_secs", r.max_delay_secs, 0.0, 600.0);
    validate_range_f64(errors, "retry.jitter_secs", r.jitter_secs, 0.0, 5.0);

    if r.max_delay_secs < r.base_delay_secs {
        errors.push(format!(
            "retry.max_delay_secs = {} is smaller than retry.base_delay_secs = {}",
            r.max_delay_secs, r.base_delay_secs
        ));
    }
}
