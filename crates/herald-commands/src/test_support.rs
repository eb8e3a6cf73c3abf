//! Shared fixtures for unit tests.

use crate::capability::{Permissions, ResolvedCapabilities};
use crate::context::{Choice, IncomingEvent, InvocationContext, InvocationKind, Reply, Transport};
use crate::descriptor::{CommandConfig, CommandData, CommandDescriptor, Cooldown, Namespace};
use crate::framework::{handler_fn, CommandHandler, Data, Error, HandlerCatalog};
use crate::gateway::GatewayStats;
use crate::permissions::PermissionTable;
use crate::prompt::PromptCollector;
use crate::registration::{MockRemoteRegistrar, RemoteRegistrar};
use crate::registry::{CommandLoader, CommandRegistry};
use crate::source::FsModuleReader;
use crate::throttle::{ManualClock, ThrottleEngine};
use async_trait::async_trait;
use herald_common::test_utils::discord_fixtures;
use herald_common::{ChannelId, GuildId, UserId};
use herald_config::{Config, ConfigCache};
use herald_i18n::Messages;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const CLIENT: UserId = discord_fixtures::test_client_id();
pub const OWNER: UserId = UserId(290_182_686_365_188_096);
pub const DEVELOPER: UserId = UserId(123_123_123_123_123_123);
pub const CHANNEL: ChannelId = ChannelId(10);
pub const GUILD: GuildId = GuildId(20);

/// Transport that records everything sent through it.
#[derive(Debug)]
pub struct RecordingTransport {
    replyable: AtomicBool,
    replies: Mutex<Vec<Reply>>,
    edits: Mutex<Vec<Reply>>,
    choices: Mutex<Vec<Choice>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            replyable: AtomicBool::new(true),
            replies: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            choices: Mutex::new(Vec::new()),
        }
    }

    pub fn set_replyable(&self, replyable: bool) {
        self.replyable.store(replyable, Ordering::SeqCst);
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<Reply> {
        self.edits.lock().unwrap().clone()
    }

    pub fn choices(&self) -> Vec<Choice> {
        self.choices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn is_replyable(&self) -> bool {
        self.replyable.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> Result<(), Error> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }

    async fn edit_reply(&self, reply: Reply) -> Result<(), Error> {
        self.edits.lock().unwrap().push(reply);
        Ok(())
    }

    async fn autocomplete(&self, choices: Vec<Choice>) -> Result<(), Error> {
        *self.choices.lock().unwrap() = choices;
        Ok(())
    }
}

fn capabilities() -> ResolvedCapabilities {
    ResolvedCapabilities::new(Some(CHANNEL)).with(CLIENT, Permissions::all())
}

/// An event in the test guild with a recording transport.
pub fn incoming(
    kind: InvocationKind,
    identifier: &str,
    user: UserId,
) -> (IncomingEvent, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let event = IncomingEvent {
        kind,
        identifier: identifier.to_string(),
        user,
        channel: CHANNEL,
        guild: Some(GUILD),
        guild_owner: None,
        channel_nsfw: false,
        arguments: BTreeMap::new(),
        focused: None,
        component_owner: None,
        payload: serde_json::Value::Null,
        transport: transport.clone(),
        capabilities: Arc::new(capabilities()),
    };
    (event, transport)
}

/// A level 0 chat-input context for `user`.
pub fn context(user: UserId) -> InvocationContext {
    let (event, _) = incoming(InvocationKind::ChatInput, "test", user);
    InvocationContext::from_event(event, Uuid::new_v4(), 0)
}

/// An enabled, level 0 command with the default cooldown and `handler`.
pub fn descriptor_with(identifier: &str, handler: Arc<dyn CommandHandler>) -> CommandDescriptor {
    CommandDescriptor {
        namespace: Namespace::Commands,
        identifier: identifier.to_string(),
        category: "system".to_string(),
        config: CommandConfig {
            enabled: true,
            permission_level: 0,
            permission_name: "User".to_string(),
            client_capabilities: Permissions::empty(),
            caller_capabilities: Permissions::empty(),
            nsfw: false,
            cooldown: Some(Cooldown::default()),
            global: true,
        },
        data: CommandData {
            name: identifier.to_string(),
            description: format!("The {identifier} command"),
            category: Some("system".to_string()),
            ..CommandData::default()
        },
        handler_name: "test".to_string(),
        handler,
        origin: PathBuf::from(format!("commands/system/{identifier}.toml")),
    }
}

/// Same as [`descriptor_with`] with a handler that does nothing.
pub fn descriptor(identifier: &str) -> CommandDescriptor {
    descriptor_with(identifier, handler_fn(|_, _| async { Ok(()) }))
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.discord.token = "test_token".to_string();
    config.discord.client_id = CLIENT;
    config.discord.test_guild_id = Some(GUILD);
    config.permissions.owner_id = Some(OWNER);
    config.permissions.developers = vec![OWNER, DEVELOPER];
    config
}

pub fn permission_table() -> Arc<PermissionTable> {
    Arc::new(PermissionTable::from_config(&test_config().permissions))
}

/// A registry backed by the file system with the built-in handlers.
pub fn empty_registry() -> CommandRegistry {
    CommandRegistry::new(
        CommandLoader::new(permission_table(), Arc::new(HandlerCatalog::with_builtins())),
        Arc::new(FsModuleReader),
    )
}

/// Application data around `descriptors` with a frozen clock and a permissive registrar.
pub fn data_with(descriptors: Vec<CommandDescriptor>) -> Arc<Data> {
    let mut registrar = MockRemoteRegistrar::new();
    registrar
        .expect_set_global_commands()
        .returning(|commands| Ok(commands.len()));
    registrar
        .expect_set_guild_commands()
        .returning(|_, commands| Ok(commands.len()));
    data_with_registrar(descriptors, Arc::new(registrar))
}

pub fn data_with_registrar(
    descriptors: Vec<CommandDescriptor>,
    registrar: Arc<dyn RemoteRegistrar>,
) -> Arc<Data> {
    let registry = empty_registry();
    for descriptor in descriptors {
        registry.register(descriptor);
    }
    Arc::new(Data {
        config: Arc::new(ConfigCache::new(test_config())),
        registry: Arc::new(registry),
        throttle: Arc::new(ThrottleEngine::with_clock(Arc::new(ManualClock::new(1_000_000)))),
        permissions: permission_table(),
        messages: Arc::new(Messages::new("en-US").unwrap()),
        prompts: Arc::new(PromptCollector::new()),
        registrar,
        gateway: Arc::new(GatewayStats::new()),
        started_at: chrono::Utc::now(),
    })
}
