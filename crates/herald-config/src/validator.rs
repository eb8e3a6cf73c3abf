//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use herald_common::{HeraldError, Result};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting every problem at once.
    pub fn validate(config: &Config) -> Result<()> {
        let problems = Self::problems(config);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(HeraldError::Config(problems.join("; ")))
        }
    }

    /// Lists human readable validation problems, empty when the config is usable.
    pub fn problems(config: &Config) -> Vec<String> {
        let mut problems = Vec::new();

        if config.discord.token.trim().is_empty() {
            problems.push("discord.token cannot be empty".to_string());
        }
        if config.discord.client_id.get() == 0 {
            problems.push("discord.client_id must be set".to_string());
        }
        if config.dispatch.prompt_timeout_seconds == 0 {
            problems.push("dispatch.prompt_timeout_seconds must be greater than zero".to_string());
        }
        if config.throttle.sweep_interval_seconds == 0 {
            problems.push("throttle.sweep_interval_seconds must be greater than zero".to_string());
        }
        if config.dispatch.locale.trim().is_empty() {
            problems.push("dispatch.locale cannot be empty".to_string());
        }
        if config.api.enabled && config.api.port == 0 {
            problems.push("api.port must be set when the API is enabled".to_string());
        }

        problems
    }
}
