//! Type-safe default values using const functions.

use crate::schema::*;
use herald_common::{LoggingConfig, UserId};
use std::path::PathBuf;

/// Default permission level that skips cooldowns (`Developer`).
pub const DEFAULT_THROTTLE_BYPASS_LEVEL: u8 = 4;

/// Default lifetime of a confirmation prompt.
pub const DEFAULT_PROMPT_TIMEOUT_SECONDS: u64 = 60;

/// Default interval between throttle sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 300;

/// Default listing API port.
pub const DEFAULT_API_PORT: u16 = 3000;

/// Default locale for user-facing messages.
pub const DEFAULT_LOCALE: &str = "en-US";

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            permissions: PermissionsConfig::default(),
            commands: CommandsConfig::default(),
            dispatch: DispatchConfig::default(),
            throttle: ThrottleConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            client_id: UserId(0),
            test_guild_id: None,
        }
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            owner_id: None,
            developers: Vec::new(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("commands"),
            refresh_on_startup: false,
            debug_registration_data: false,
            debug_throttling: false,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            throttle_bypass_level: DEFAULT_THROTTLE_BYPASS_LEVEL,
            allow_direct_messages: false,
            prompt_timeout_seconds: DEFAULT_PROMPT_TIMEOUT_SECONDS,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_API_PORT,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            support_server: None,
            invite: None,
        }
    }
}
