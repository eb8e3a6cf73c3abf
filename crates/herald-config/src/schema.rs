//! Configuration schema definitions using serde.

use herald_common::{GuildId, HeraldError, LoggingConfig, UserId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Herald.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Permission level membership.
    pub permissions: PermissionsConfig,
    /// Command discovery and registration.
    pub commands: CommandsConfig,
    /// Dispatch behaviour.
    pub dispatch: DispatchConfig,
    /// Throttle engine maintenance.
    pub throttle: ThrottleConfig,
    /// Listing API.
    pub api: ApiConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Links shown by informational commands.
    pub links: LinksConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Application (bot user) ID.
    pub client_id: UserId,
    /// Guild that receives non-global commands.
    pub test_guild_id: Option<GuildId>,
}

/// Users that hold the configured operator tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Bot owner, the highest permission level.
    pub owner_id: Option<UserId>,
    /// Bot developers, the second highest permission level.
    pub developers: Vec<UserId>,
}

/// Command discovery and remote registration configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Root directory holding one sub-directory per namespace.
    pub directory: PathBuf,
    /// Push command data to Discord during startup.
    pub refresh_on_startup: bool,
    /// Log the command data sent to Discord.
    pub debug_registration_data: bool,
    /// Trace every throttle decision.
    pub debug_throttling: bool,
}

/// Dispatch behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Permission level at or above which cooldowns are skipped.
    pub throttle_bypass_level: u8,
    /// Accept interactions outside of guilds.
    pub allow_direct_messages: bool,
    /// How long confirmation prompts wait for an answer.
    pub prompt_timeout_seconds: u64,
    /// Locale for user-facing messages.
    pub locale: String,
}

/// Throttle engine maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Interval between sweeps of fully expired throttle keys.
    pub sweep_interval_seconds: u64,
}

/// Listing API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Whether the listing API is served.
    pub enabled: bool,
    /// Bind address.
    pub bind: String,
    /// TCP port.
    pub port: u16,
}

/// Links shown by informational commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Support server invite.
    pub support_server: Option<String>,
    /// Bot invite URL.
    pub invite: Option<String>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), HeraldError> {
        crate::validator::ConfigValidator::validate(self)
    }
}
