//! Persona roster validation.

use std::collections::HashSet;

use crate::schema::StackedConfig;

pub(super) fn validate_personas(errors: &mut Vec<String>, config: &StackedConfig) {
    if config.personas.is_empty() {
        errors.push("personas must contain at least one entry".into());
        return;
    }

    let mut seen = HashSet::new();
    for (i, p) in config.personas.iter().enumerate() {
        if p.id.trim().is_empty() {
            errors.push(format!("personas[{i}].id must not be empty"));
        } else if !seen.insert(p.id.as_str()) {
            errors.push(format!("personas[{i}].id = {:?} is a duplicate", p.id));
        }
        if p.model.trim().is_empty() {
            errors.push(format!("personas[{i}].model must not be empty"));
        }
    }
}
