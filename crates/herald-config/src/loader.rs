//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use herald_common::{GuildId, HeraldError, Result, UserId};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loader with atomic file operations.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, applies environment overrides and validates it.
    ///
    /// A missing file is not an error: defaults plus the environment are used instead,
    /// so a token-only deployment works without any YAML.
    pub async fn load(&self) -> Result<Config> {
        let mut config = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Self::parse(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;
        debug!(path = %self.path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parses a YAML document into a configuration without validating it.
    pub fn parse(raw: &str) -> Result<Config> {
        serde_yaml::from_str(raw).map_err(|e| HeraldError::Serialization(e.to_string()))
    }

    /// Saves configuration to file atomically.
    ///
    /// The document is written to a temporary file next to the target and renamed over it,
    /// so readers and the watcher never observe a partial file.
    pub async fn save(&self, config: &Config) -> Result<()> {
        let yaml =
            serde_yaml::to_string(config).map_err(|e| HeraldError::Serialization(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            tmp.write_all(yaml.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| HeraldError::Io(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| HeraldError::Config(format!("config save task failed: {e}")))?
    }
}

/// Applies the supported environment variable overrides using `lookup`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("DISCORD_TOKEN") {
        config.discord.token = token;
    }

    if let Some(id) = lookup("CLIENT_ID").and_then(|v| v.trim().parse().ok()) {
        config.discord.client_id = UserId(id);
    }

    if let Some(raw) = lookup("TEST_SERVER_GUILD_ID") {
        config.discord.test_guild_id = raw.trim().parse().ok().map(GuildId);
    }

    if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
        config.api.port = port;
    }

    if let Some(flag) = lookup("REFRESH_SLASH_COMMAND_API_DATA") {
        config.commands.refresh_on_startup = flag.trim().eq_ignore_ascii_case("true");
    }
}
