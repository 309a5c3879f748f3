//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::AppConfig;
use appkit_common::ConfigError;

use helpers::{validate_min, validate_non_empty};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_app(&mut errors, config);
    validate_runtime(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_app(errors: &mut Vec<String>, config: &AppConfig) {
    validate_non_empty(errors, "app.id", &config.app.id);
    validate_non_empty(errors, "app.display_name", &config.app.display_name);
}

fn validate_runtime(errors: &mut Vec<String>, config: &AppConfig) {
    let runtime = &config.runtime;
    validate_non_empty(errors, "runtime.default_channel", &runtime.default_channel);
    if let Some(timeout) = runtime.invoke_timeout_ms {
        validate_min(errors, "runtime.invoke_timeout_ms", timeout, 1);
    }
    validate_min(
        errors,
        "runtime.state_channel_capacity",
        runtime.state_channel_capacity as u64,
        1,
    );
    validate_min(
        errors,
        "runtime.event_bus_capacity",
        runtime.event_bus_capacity as u64,
        1,
    );
}
