//! Shared application data, the handler trait and the handler catalogue.

use crate::context::InvocationContext;
use crate::gateway::GatewayStats;
use crate::permissions::PermissionTable;
use crate::prompt::PromptCollector;
use crate::registration::RemoteRegistrar;
use crate::registry::CommandRegistry;
use crate::throttle::ThrottleEngine;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_config::ConfigCache;
use herald_i18n::Messages;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

/// Application data accessible in all handlers.
pub struct Data {
    /// Live configuration.
    pub config: Arc<ConfigCache>,
    /// Loaded commands and components.
    pub registry: Arc<CommandRegistry>,
    /// Cooldown bookkeeping.
    pub throttle: Arc<ThrottleEngine>,
    /// Permission levels.
    pub permissions: Arc<PermissionTable>,
    /// User-facing messages.
    pub messages: Arc<Messages>,
    /// Pending confirmation prompts.
    pub prompts: Arc<PromptCollector>,
    /// Remote application command registry.
    pub registrar: Arc<dyn RemoteRegistrar>,
    /// Gateway figures reported by the Discord adapter.
    pub gateway: Arc<GatewayStats>,
    /// When the process started.
    pub started_at: DateTime<Utc>,
}

/// Application error type for handlers.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Code run for a command or component once dispatch has admitted it.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the handler for one invocation.
    async fn run(&self, data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error>;
}

/// Adapts an async function into a [`CommandHandler`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(Arc<Data>, InvocationContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    async fn run(&self, data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
        (self.0)(data, ctx).await
    }
}

/// Wraps `f` as a shareable handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn CommandHandler>
where
    F: Fn(Arc<Data>, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// Handlers addressable by the `run` key of a declaration.
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl HandlerCatalog {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalogue holding the built-in handlers.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        crate::builtin::register_builtins(&mut catalog);
        catalog
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Looks a handler up by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Registered handler names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = HandlerCatalog::with_builtins();
        for name in ["ping", "stats", "permlevel", "help", "reload", "deploy", "invite", "support"] {
            assert!(catalog.get(name).is_some(), "missing builtin {name}");
        }
        assert!(catalog.get("eval").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut catalog = HandlerCatalog::new();
        catalog
            .register("noop", handler_fn(|_, _| async { Ok(()) }))
            .register("noop", handler_fn(|_, _| async { Err("replaced".into()) }));
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["noop"]);
    }
}
