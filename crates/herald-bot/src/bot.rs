//! Core bot wiring: shared state, the gateway event handler and startup.

use crate::api;
use crate::error::{BotError, BotResult};
use crate::interaction::EventBuilder;
use crate::registrar::SerenityRegistrar;
use async_trait::async_trait;
use herald_commands::{
    clear_application_commands, start_throttle_sweep_task, sync_application_commands,
    CommandLoader, CommandRegistry, Data, Dispatcher, DispatchOutcome, FsModuleReader,
    GatewayStats, HandlerCatalog, PermissionTable, PromptCollector, RemoteRegistrar,
    ThrottleEngine,
};
use herald_config::{Config, ConfigCache, ConfigLoader, ConfigWatcher};
use herald_i18n::Messages;
use serenity::client::{Client, Context, EventHandler};
use serenity::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::application::Interaction;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::guild::{Guild, UnavailableGuild};
use serenity::model::id::ApplicationId;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const LATENCY_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Gateway event handler feeding interactions to the dispatcher.
pub struct Handler {
    dispatcher: Dispatcher,
    events: EventBuilder,
    gateway: Arc<GatewayStats>,
}

/// Records a guild becoming available; only `is_new` guilds are announced.
fn record_guild_available(
    gateway: &GatewayStats,
    guild: herald_common::GuildId,
    name: &str,
    members: u64,
    is_new: bool,
) {
    gateway.guild_available(guild, members);
    if is_new {
        info!(guild = %guild, members, "[GUILD JOIN] {name} has added the bot");
    } else {
        debug!(guild = %guild, members, "Guild available: {name}");
    }
}

/// Records a guild going away; outages keep the guild counted.
fn record_guild_removed(
    gateway: &GatewayStats,
    guild: herald_common::GuildId,
    name: Option<&str>,
    unavailable: bool,
) {
    if unavailable {
        warn!(guild = %guild, "Guild became unavailable");
        return;
    }
    gateway.guild_removed(guild);
    info!(guild = %guild, "[GUILD REMOVE] {} has removed the bot", name.unwrap_or("A server"));
}

/// Samples shard heartbeat latency into `gateway` periodically.
fn start_latency_poll(shard_manager: Arc<ShardManager>, gateway: Arc<GatewayStats>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LATENCY_POLL_INTERVAL);
        loop {
            interval.tick().await;
            let latency = shard_manager
                .runners
                .lock()
                .await
                .values()
                .find_map(|runner| runner.latency);
            gateway.set_latency(latency);
        }
    })
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, is_new: Option<bool>) {
        record_guild_available(
            &self.gateway,
            herald_common::GuildId(guild.id.get()),
            &guild.name,
            guild.member_count,
            is_new == Some(true),
        );
    }

    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        record_guild_removed(
            &self.gateway,
            herald_common::GuildId(incomplete.id.get()),
            full.as_ref().map(|guild| guild.name.as_str()),
            incomplete.unavailable,
        );
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(event) = self.events.build(&ctx, interaction).await else {
            return;
        };
        match self.dispatcher.dispatch(event).await {
            DispatchOutcome::Completed => {}
            DispatchOutcome::Rejected(rejection) => debug!(?rejection, "Interaction rejected"),
            DispatchOutcome::HandlerFailed(detail) => warn!("Interaction handler failed: {detail}"),
        }
    }
}

/// Builds the command registry and loads every declaration under the configured directory.
pub async fn load_registry(
    config: &Config,
    permissions: Arc<PermissionTable>,
) -> BotResult<CommandRegistry> {
    let registry = CommandRegistry::new(
        CommandLoader::new(permissions, Arc::new(HandlerCatalog::with_builtins())),
        Arc::new(FsModuleReader),
    );
    let report = registry.load_directory(&config.commands.directory).await?;
    for failure in &report.failures {
        error!("Skipping declaration {}: {}", failure.origin.display(), failure.error);
    }
    info!(
        loaded = report.loaded.len(),
        failed = report.failures.len(),
        "Loaded command declarations"
    );
    Ok(registry)
}

/// The assembled application.
pub struct Herald {
    data: Arc<Data>,
    loader: ConfigLoader,
}

impl Herald {
    /// Assembles shared state from `config`; nothing connects to Discord yet.
    pub async fn build(config: Config, loader: ConfigLoader) -> BotResult<Self> {
        let http = Arc::new(Http::new(&config.discord.token));
        http.set_application_id(ApplicationId::new(config.discord.client_id.get()));
        let registrar: Arc<dyn RemoteRegistrar> = Arc::new(SerenityRegistrar::new(http));
        Self::with_registrar(config, loader, registrar).await
    }

    /// Same as [`Herald::build`] with a custom registrar.
    pub async fn with_registrar(
        config: Config,
        loader: ConfigLoader,
        registrar: Arc<dyn RemoteRegistrar>,
    ) -> BotResult<Self> {
        let permissions = Arc::new(PermissionTable::from_config(&config.permissions));
        let registry = load_registry(&config, Arc::clone(&permissions)).await?;
        let messages = Messages::new(&config.dispatch.locale)?;

        let data = Arc::new(Data {
            config: Arc::new(ConfigCache::new(config)),
            registry: Arc::new(registry),
            throttle: Arc::new(ThrottleEngine::new()),
            permissions,
            messages: Arc::new(messages),
            prompts: Arc::new(PromptCollector::new()),
            registrar,
            gateway: Arc::new(GatewayStats::new()),
            started_at: chrono::Utc::now(),
        });
        Ok(Self { data, loader })
    }

    /// Shared application state.
    pub fn data(&self) -> &Arc<Data> {
        &self.data
    }

    /// Removes every registered application command.
    pub async fn clear_commands(&self) -> BotResult<()> {
        let config = self.data.config.get();
        clear_application_commands(self.data.registrar.as_ref(), config.discord.test_guild_id)
            .await
            .map_err(|e| BotError::Registration(e.to_string()))
    }

    /// Pushes application command data, logging instead of failing.
    pub async fn refresh_commands(&self) {
        let config = self.data.config.get();
        if let Err(e) = sync_application_commands(
            &self.data.registry,
            self.data.registrar.as_ref(),
            config.discord.test_guild_id,
            config.commands.debug_registration_data,
        )
        .await
        {
            error!("Startup command refresh failed: {e}");
        }
    }

    /// Starts background tasks and runs the gateway client until it stops.
    pub async fn start(self) -> BotResult<()> {
        let config = self.data.config.get();

        let _watcher = ConfigWatcher::spawn(self.loader.clone(), Arc::clone(&self.data.config))?;

        if config.commands.refresh_on_startup {
            self.refresh_commands().await;
        }

        let _sweeper = start_throttle_sweep_task(
            Arc::clone(&self.data.throttle),
            Duration::from_secs(config.throttle.sweep_interval_seconds),
        );

        if config.api.enabled {
            let registry = Arc::clone(&self.data.registry);
            let bind = config.api.bind.clone();
            let port = config.api.port;
            tokio::spawn(async move {
                if let Err(e) = api::serve(registry, &bind, port).await {
                    error!("Listing API stopped: {e}");
                }
            });
        }

        let http = Arc::new(Http::new(&config.discord.token));
        http.set_application_id(ApplicationId::new(config.discord.client_id.get()));
        let handler = Handler {
            dispatcher: Dispatcher::new(Arc::clone(&self.data)),
            events: EventBuilder::new(http, config.discord.client_id),
            gateway: Arc::clone(&self.data.gateway),
        };

        let mut client = Client::builder(&config.discord.token, GatewayIntents::GUILDS)
            .event_handler(handler)
            .await?;
        let _latency = start_latency_poll(Arc::clone(&client.shard_manager), Arc::clone(&self.data.gateway));
        client.start().await?;
        Ok(())
    }
}

impl std::fmt::Debug for Herald {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Herald")
            .field("registry", &self.data.registry)
            .finish_non_exhaustive()
    }
}
