//! Live/auto mode timer validation.

use super::helpers::validate_range;
use crate::schema::StackedConfig;

pub(super) fn validate_modes(errors: &mut Vec<String>, config: &StackedConfig) {
    let m = &config.modes;
    validate_range(
        errors,
        "modes.live_poll_interval_secs",
        m.live_poll_interval_secs,
        1,
        3600,
    );
    validate_range(
        errors,
        "modes.auto_prompt_interval_secs",
        m.auto_prompt_interval_secs,
        5,
        86_400,
    );
    validate_range(errors, "modes.thoughts_limit", m.thoughts_limit, 1, 500);

    if m.auto_prompt.trim().is_empty() {
        errors.push("modes.auto_prompt must not be empty".into());
    }
}
