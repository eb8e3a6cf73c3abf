//! Pushing application command data to the remote registry.

use crate::descriptor::CommandData;
use crate::framework::Error;
use crate::registry::CommandRegistry;
use async_trait::async_trait;
use herald_common::GuildId;
use tracing::{debug, error, info, warn};

/// The remote application command registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteRegistrar: Send + Sync {
    /// Replaces every global command, returning how many are registered.
    async fn set_global_commands(&self, commands: Vec<CommandData>) -> Result<usize, Error>;

    /// Replaces every command of `guild`, returning how many are registered.
    async fn set_guild_commands(
        &self,
        guild: GuildId,
        commands: Vec<CommandData>,
    ) -> Result<usize, Error>;
}

/// Counts of what was pushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Commands registered globally.
    pub global: usize,
    /// Commands registered in the test guild.
    pub guild: usize,
}

/// Splits enabled application commands into global and test guild data.
pub fn partition_commands(registry: &CommandRegistry) -> (Vec<CommandData>, Vec<CommandData>) {
    let mut global = Vec::new();
    let mut guild = Vec::new();

    let mut descriptors: Vec<_> = registry
        .all()
        .into_iter()
        .filter(|d| d.namespace.is_application_command() && d.config.enabled)
        .collect();
    descriptors.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    for descriptor in descriptors {
        if descriptor.config.global {
            global.push(descriptor.data.clone());
        } else {
            guild.push(descriptor.data.clone());
        }
    }
    (global, guild)
}

/// Pushes every enabled application command, global ones globally and the rest to the test guild.
pub async fn sync_application_commands(
    registry: &CommandRegistry,
    registrar: &dyn RemoteRegistrar,
    test_guild: Option<GuildId>,
    debug_data: bool,
) -> Result<SyncReport, Error> {
    let (global, guild) = partition_commands(registry);
    if debug_data {
        debug!(global = ?global, guild = ?guild, "Application command data");
    }

    let mut report = SyncReport::default();
    match test_guild {
        Some(guild_id) => {
            report.guild = registrar
                .set_guild_commands(guild_id, guild)
                .await
                .map_err(|e| {
                    error!("Failed to refresh test server commands: {e}");
                    e
                })?;
        }
        None if !guild.is_empty() => {
            warn!(
                count = guild.len(),
                "No test server configured, skipping non-global commands"
            );
        }
        None => {}
    }

    report.global = registrar
        .set_global_commands(global)
        .await
        .map_err(|e| {
            error!("Failed to refresh global commands: {e}");
            e
        })?;

    info!(global = report.global, guild = report.guild, "Refreshed application command data");
    Ok(report)
}

/// Removes every registered application command, globally and from the test guild.
pub async fn clear_application_commands(
    registrar: &dyn RemoteRegistrar,
    test_guild: Option<GuildId>,
) -> Result<(), Error> {
    registrar.set_global_commands(Vec::new()).await?;
    if let Some(guild) = test_guild {
        registrar.set_guild_commands(guild, Vec::new()).await?;
    }
    info!("Cleared application command data");
    Ok(())
}
