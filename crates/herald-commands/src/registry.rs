//! Declaration validation and the in-memory command registry.

use crate::capability::{parse_capability, Permissions};
use crate::context::InvocationKind;
use crate::descriptor::{CommandConfig, CommandDescriptor, Cooldown, CooldownDecl, Namespace};
use crate::framework::HandlerCatalog;
use crate::permissions::PermissionTable;
use crate::source::{discover, ModuleLocation, ModuleReader, ModuleSource};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// A declaration that cannot become a descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The file could not be read or parsed.
    #[error("Failed to read declaration {}: {reason}", .origin.display())]
    Malformed {
        /// Declaration file.
        origin: PathBuf,
        /// Read or parse error.
        reason: String,
    },

    /// Neither `data.name` nor the file name yields an identifier.
    #[error("Declaration has no usable name\nOrigin: {}", .origin.display())]
    EmptyIdentifier {
        /// Declaration file.
        origin: PathBuf,
    },

    /// `permission_level` names no configured level.
    #[error("The permission level \"{level}\" is not currently configured\nCommand: {identifier} ({})", .origin.display())]
    UnknownPermissionLevel {
        /// Entry identifier.
        identifier: String,
        /// Declaration file.
        origin: PathBuf,
        /// Level name as declared.
        level: String,
    },

    /// The cooldown settings are out of range.
    #[error("Invalid cooldown: {reason}\nCommand: {identifier} ({})", .origin.display())]
    InvalidCooldown {
        /// Entry identifier.
        identifier: String,
        /// Declaration file.
        origin: PathBuf,
        /// Which setting is wrong.
        reason: String,
    },

    /// A capability name is not recognised.
    #[error("Unknown capability \"{capability}\"\nCommand: {identifier} ({})", .origin.display())]
    UnknownCapability {
        /// Entry identifier.
        identifier: String,
        /// Declaration file.
        origin: PathBuf,
        /// Capability name as declared.
        capability: String,
    },

    /// `run` is missing or blank.
    #[error("Missing run handler\nCommand: {identifier} ({})", .origin.display())]
    MissingHandler {
        /// Entry identifier.
        identifier: String,
        /// Declaration file.
        origin: PathBuf,
    },

    /// `run` names no handler in the catalog.
    #[error("No handler named \"{handler}\" is registered\nCommand: {identifier} ({})", .origin.display())]
    UnknownHandler {
        /// Entry identifier.
        identifier: String,
        /// Declaration file.
        origin: PathBuf,
        /// Handler name as declared.
        handler: String,
    },

    /// A reloaded declaration resolves to another identifier.
    #[error("Reload cannot rename \"{identifier}\" to \"{renamed}\" ({})", .origin.display())]
    IdentifierChanged {
        /// Identifier of the loaded entry.
        identifier: String,
        /// Declaration file.
        origin: PathBuf,
        /// Identifier the file now declares.
        renamed: String,
    },
}

impl ValidationError {
    /// Declaration file the error refers to.
    pub fn origin(&self) -> &Path {
        match self {
            Self::Malformed { origin, .. }
            | Self::EmptyIdentifier { origin }
            | Self::UnknownPermissionLevel { origin, .. }
            | Self::InvalidCooldown { origin, .. }
            | Self::UnknownCapability { origin, .. }
            | Self::MissingHandler { origin, .. }
            | Self::UnknownHandler { origin, .. }
            | Self::IdentifierChanged { origin, .. } => origin,
        }
    }
}

/// Registry level failures.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No entry to reload.
    #[error("No {namespace} entry named \"{identifier}\"")]
    NotFound {
        /// Namespace searched.
        namespace: Namespace,
        /// Requested identifier.
        identifier: String,
    },

    /// The declaration failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The declaration directory could not be walked.
    #[error("Failed to discover declarations in {}: {source}", .root.display())]
    Discovery {
        /// Directory being walked.
        root: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Turns parsed declarations into validated descriptors.
#[derive(Debug, Clone)]
pub struct CommandLoader {
    permissions: Arc<PermissionTable>,
    handlers: Arc<HandlerCatalog>,
}

impl CommandLoader {
    /// Validates against `permissions` and resolves `run` through `handlers`.
    pub fn new(permissions: Arc<PermissionTable>, handlers: Arc<HandlerCatalog>) -> Self {
        Self {
            permissions,
            handlers,
        }
    }

    /// Applies defaults and checks every invariant of a declaration.
    pub fn load(&self, source: ModuleSource) -> Result<CommandDescriptor, ValidationError> {
        let origin = source.origin.clone();
        let identifier = Some(source.declaration.data.name.trim())
            .filter(|name| !name.is_empty())
            .or_else(|| source.file_stem())
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ValidationError::EmptyIdentifier {
                origin: origin.clone(),
            })?;
        let category = source
            .declaration
            .data
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| source.parent_name().map(str::to_string))
            .unwrap_or_else(|| "uncategorized".to_string());

        let decl = source.declaration.config;

        let permission_level = match decl.permission_level.as_deref() {
            None => self.permissions.lowest_level(),
            Some(name) => self.permissions.level_for_name(name).ok_or_else(|| {
                ValidationError::UnknownPermissionLevel {
                    identifier: identifier.clone(),
                    origin: origin.clone(),
                    level: name.to_string(),
                }
            })?,
        };
        let permission_name = self
            .permissions
            .name_for_level(permission_level)
            .unwrap_or_default()
            .to_string();

        let cooldown = resolve_cooldown(decl.cooldown, &identifier, &origin)?;
        let client_capabilities = resolve_capabilities(&decl.client_capabilities, &identifier, &origin)?;
        let caller_capabilities = resolve_capabilities(&decl.caller_capabilities, &identifier, &origin)?;

        let handler_name = source
            .declaration
            .run
            .filter(|run| !run.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingHandler {
                identifier: identifier.clone(),
                origin: origin.clone(),
            })?;
        let handler = self
            .handlers
            .get(&handler_name)
            .ok_or_else(|| ValidationError::UnknownHandler {
                identifier: identifier.clone(),
                origin: origin.clone(),
                handler: handler_name.clone(),
            })?;

        let mut data = source.declaration.data;
        data.name.clone_from(&identifier);
        data.category = Some(category.clone());

        Ok(CommandDescriptor {
            namespace: source.namespace,
            identifier,
            category,
            config: CommandConfig {
                enabled: decl.enabled.unwrap_or(true),
                permission_level,
                permission_name,
                client_capabilities,
                caller_capabilities,
                nsfw: decl.nsfw.unwrap_or(false),
                cooldown,
                global: decl.global.unwrap_or(false),
            },
            data,
            handler_name,
            handler,
            origin,
        })
    }
}

fn resolve_cooldown(
    decl: Option<CooldownDecl>,
    identifier: &str,
    origin: &Path,
) -> Result<Option<Cooldown>, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidCooldown {
        identifier: identifier.to_string(),
        origin: origin.to_path_buf(),
        reason,
    };

    let settings = match decl {
        None | Some(CooldownDecl::Toggle(true)) => return Ok(Some(Cooldown::default())),
        Some(CooldownDecl::Toggle(false)) => return Ok(None),
        Some(CooldownDecl::Settings(settings)) => settings,
    };

    let defaults = Cooldown::default();
    let usages = match settings.usages {
        None => defaults.usages,
        Some(n) => u32::try_from(n)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| invalid(format!("usages must be at least 1, got {n}")))?,
    };
    let window_ms = match settings.duration {
        None => defaults.window_ms,
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds_to_millis(seconds),
        Some(seconds) => {
            return Err(invalid(format!(
                "duration must be a non-negative number of seconds, got {seconds}"
            )))
        }
    };

    Ok(Some(Cooldown {
        scope: settings.scope.unwrap_or(defaults.scope),
        usages,
        window_ms,
    }))
}

/// Whole milliseconds in `seconds`, saturating at `u64::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds_to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0).trunc() as u64
}

fn resolve_capabilities(
    names: &[String],
    identifier: &str,
    origin: &Path,
) -> Result<Permissions, ValidationError> {
    names.iter().try_fold(Permissions::empty(), |acc, name| {
        parse_capability(name)
            .map(|flag| acc | flag)
            .ok_or_else(|| ValidationError::UnknownCapability {
                identifier: identifier.to_string(),
                origin: origin.to_path_buf(),
                capability: name.clone(),
            })
    })
}

/// A declaration that failed to load during a bulk load.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    /// Declaration file that failed.
    pub origin: PathBuf,
    /// Why it failed.
    pub error: ValidationError,
}

/// Outcome of loading many declarations.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Keys of the registered entries.
    pub loaded: Vec<(Namespace, String)>,
    /// Declarations that were skipped.
    pub failures: Vec<LoadFailure>,
}

/// Validated descriptors keyed by namespace and identifier.
pub struct CommandRegistry {
    entries: DashMap<(Namespace, String), Arc<CommandDescriptor>>,
    loader: CommandLoader,
    reader: Arc<dyn ModuleReader>,
}

impl CommandRegistry {
    /// An empty registry that loads through `loader` and reads with `reader`.
    pub fn new(loader: CommandLoader, reader: Arc<dyn ModuleReader>) -> Self {
        Self {
            entries: DashMap::new(),
            loader,
            reader,
        }
    }

    /// Inserts or overwrites by namespace and identifier, returning the previous entry.
    pub fn register(&self, descriptor: CommandDescriptor) -> Option<Arc<CommandDescriptor>> {
        let key = descriptor.key();
        self.entries.insert(key, Arc::new(descriptor))
    }

    /// The entry named `identifier` in `namespace`.
    pub fn get(&self, namespace: Namespace, identifier: &str) -> Option<Arc<CommandDescriptor>> {
        self.entries
            .get(&(namespace, identifier.to_string()))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Finds the descriptor an event of `kind` addresses.
    pub fn resolve(&self, kind: InvocationKind, identifier: &str) -> Option<Arc<CommandDescriptor>> {
        self.get(kind.namespace(), identifier)
    }

    /// Re-reads the declaration of an entry and replaces it.
    ///
    /// The new descriptor is published only once it has loaded; on failure the
    /// current entry stays in place. The identifier cannot change on reload, so
    /// the swap is a single insert over the same key.
    pub async fn reload(
        &self,
        namespace: Namespace,
        identifier: &str,
    ) -> Result<Arc<CommandDescriptor>, RegistryError> {
        let current = self
            .get(namespace, identifier)
            .ok_or_else(|| RegistryError::NotFound {
                namespace,
                identifier: identifier.to_string(),
            })?;

        let location = ModuleLocation {
            namespace,
            origin: current.origin.clone(),
        };
        let source = self.reader.read(&location).await?;
        let descriptor = self.loader.load(source)?;
        if descriptor.identifier != current.identifier {
            return Err(ValidationError::IdentifierChanged {
                identifier: current.identifier.clone(),
                origin: current.origin.clone(),
                renamed: descriptor.identifier,
            }
            .into());
        }

        let descriptor = Arc::new(descriptor);
        self.entries.insert(current.key(), Arc::clone(&descriptor));
        info!(namespace = %namespace, identifier = %descriptor.identifier, "Reloaded declaration");
        Ok(descriptor)
    }

    /// Loads every location, collecting failures instead of stopping at the first one.
    pub async fn load_all(&self, locations: &[ModuleLocation]) -> LoadReport {
        let mut report = LoadReport::default();
        for location in locations {
            let loaded = match self.reader.read(location).await {
                Ok(source) => self.loader.load(source),
                Err(e) => Err(e),
            };
            match loaded {
                Ok(descriptor) => {
                    debug!(namespace = %descriptor.namespace, identifier = %descriptor.identifier, "Loaded declaration");
                    report.loaded.push(descriptor.key());
                    self.register(descriptor);
                }
                Err(e) => {
                    error!("Error encountered while loading {}: {e}", location.origin.display());
                    report.failures.push(LoadFailure {
                        origin: location.origin.clone(),
                        error: e,
                    });
                }
            }
        }
        info!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "Finished loading declarations"
        );
        report
    }

    /// Discovers and loads everything under `root`.
    pub async fn load_directory(&self, root: &Path) -> Result<LoadReport, RegistryError> {
        let root_buf = root.to_path_buf();
        let locations = tokio::task::spawn_blocking(move || discover(&root_buf))
            .await
            .map_err(|e| RegistryError::Discovery {
                root: root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })?
            .map_err(|source| RegistryError::Discovery {
                root: root.to_path_buf(),
                source,
            })?;
        Ok(self.load_all(&locations).await)
    }

    /// Entries of `namespace` sorted by category, then identifier.
    pub fn list(&self, namespace: Namespace) -> Vec<Arc<CommandDescriptor>> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == namespace)
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        entries.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        entries
    }

    /// Every entry across namespaces.
    pub fn all(&self) -> Vec<Arc<CommandDescriptor>> {
        self.entries.iter().map(|entry| Arc::clone(entry.value())).collect()
    }

    /// Number of entries in `namespace`.
    pub fn count(&self, namespace: Namespace) -> usize {
        self.entries.iter().filter(|entry| entry.key().0 == namespace).count()
    }

    /// Number of entries across namespaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CooldownScope;
    use crate::framework::handler_fn;
    use crate::source::{FsModuleReader, ModuleDeclaration};
    use herald_common::test_utils::{create_temp_dir, write_file};
    use herald_config::PermissionsConfig;

    fn loader() -> CommandLoader {
        let mut catalog = HandlerCatalog::new();
        catalog.register("noop", handler_fn(|_, _| async { Ok(()) }));
        CommandLoader::new(
            Arc::new(PermissionTable::from_config(&PermissionsConfig::default())),
            Arc::new(catalog),
        )
    }

    fn source(origin: &str, raw: &str) -> ModuleSource {
        ModuleSource::parse(
            &ModuleLocation {
                namespace: Namespace::Commands,
                origin: PathBuf::from(origin),
            },
            raw,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let descriptor = loader()
            .load(source("commands/system/ping.toml", "run = \"noop\""))
            .unwrap();

        assert_eq!(descriptor.identifier, "ping");
        assert_eq!(descriptor.category, "system");
        assert_eq!(descriptor.data.name, "ping");
        assert_eq!(descriptor.data.category.as_deref(), Some("system"));
        assert!(descriptor.config.enabled);
        assert!(!descriptor.config.nsfw);
        assert!(!descriptor.config.global);
        assert_eq!(descriptor.config.permission_level, 0);
        assert_eq!(descriptor.config.permission_name, "User");
        assert_eq!(descriptor.config.cooldown, Some(Cooldown::default()));
        assert_eq!(descriptor.handler_name, "noop");
    }

    #[test]
    fn test_declared_values_override_defaults() {
        let raw = r#"
run = "noop"

[config]
permission_level = "Developer"
client_capabilities = ["EmbedLinks"]
caller_capabilities = ["KICK_MEMBERS"]
nsfw = true
global = true
cooldown = { scope = "global", usages = 3, duration = 30 }

[data]
name = "pong"
category = "fun"
description = "Pong"
"#;
        let descriptor = loader().load(source("commands/system/ping.toml", raw)).unwrap();
        assert_eq!(descriptor.identifier, "pong");
        assert_eq!(descriptor.category, "fun");
        assert_eq!(descriptor.config.permission_level, 4);
        assert_eq!(descriptor.config.client_capabilities, Permissions::EMBED_LINKS);
        assert_eq!(descriptor.config.caller_capabilities, Permissions::KICK_MEMBERS);
        assert!(descriptor.config.nsfw);
        assert!(descriptor.config.global);
        assert_eq!(
            descriptor.config.cooldown,
            Some(Cooldown {
                scope: CooldownScope::Global,
                usages: 3,
                window_ms: 30_000
            })
        );
    }

    #[test]
    fn test_validation_failures() {
        let loader = loader();
        let cases = [
            ("[config]\npermission_level = \"Janitor\"", "UnknownPermissionLevel"),
            ("run = \"noop\"\n[config]\ncooldown = { usages = 0 }", "InvalidCooldown"),
            ("run = \"noop\"\n[config]\ncooldown = { duration = -1 }", "InvalidCooldown"),
            ("run = \"noop\"\n[config]\nclient_capabilities = [\"Fly\"]", "UnknownCapability"),
            ("[data]\ndescription = \"no run\"", "MissingHandler"),
            ("run = \"missing\"", "UnknownHandler"),
        ];

        for (raw, expected) in cases {
            let err = loader.load(source("commands/system/ping.toml", raw)).unwrap_err();
            assert!(format!("{err:?}").starts_with(expected), "{raw}: {err:?}");
            assert_eq!(err.origin(), Path::new("commands/system/ping.toml"));
            assert!(err.to_string().contains("Command: ping"));
        }
    }

    #[test]
    fn test_disabled_cooldown() {
        let descriptor = loader()
            .load(source("commands/system/ping.toml", "run = \"noop\"\n[config]\ncooldown = false"))
            .unwrap();
        assert_eq!(descriptor.config.cooldown, None);
    }

    #[test]
    fn test_fractional_and_huge_durations() {
        let loader = loader();
        let window = |raw: &str| {
            loader
                .load(source("commands/system/ping.toml", raw))
                .unwrap()
                .config
                .cooldown
                .unwrap()
                .window_ms
        };

        assert_eq!(window("run = \"noop\"\n[config]\ncooldown = { duration = 2.5 }"), 2_500);
        assert_eq!(window("run = \"noop\"\n[config]\ncooldown = { duration = 0.0015 }"), 1);
        assert_eq!(window("run = \"noop\"\n[config]\ncooldown = { duration = 1e300 }"), u64::MAX);

        let err = loader
            .load(source("commands/system/ping.toml", "run = \"noop\"\n[config]\ncooldown = { duration = nan }"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCooldown { .. }));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let src = ModuleSource {
            namespace: Namespace::Commands,
            origin: PathBuf::from("/"),
            declaration: ModuleDeclaration {
                run: Some("noop".to_string()),
                ..ModuleDeclaration::default()
            },
        };
        assert!(matches!(
            loader().load(src),
            Err(ValidationError::EmptyIdentifier { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_directory_and_reload() {
        let dir = create_temp_dir();
        let ping = write_file(dir.path(), "commands/system/ping.toml", "run = \"noop\"");
        write_file(dir.path(), "commands/system/broken.toml", "run = \"missing\"");
        write_file(dir.path(), "commands/fun/roll.toml", "run = \"noop\"");

        let registry = CommandRegistry::new(loader(), Arc::new(FsModuleReader));
        let report = registry.load_directory(dir.path()).await.unwrap();
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.failures.len(), 1);

        let listed: Vec<_> = registry
            .list(Namespace::Commands)
            .iter()
            .map(|d| d.identifier.clone())
            .collect();
        assert_eq!(listed, vec!["roll", "ping"]);

        std::fs::write(&ping, "run = \"noop\"\n[config]\nnsfw = true").unwrap();
        let reloaded = registry.reload(Namespace::Commands, "ping").await.unwrap();
        assert!(reloaded.config.nsfw);
        assert!(registry.get(Namespace::Commands, "ping").unwrap().config.nsfw);

        std::fs::write(&ping, "[config]\nnsfw = false").unwrap();
        let err = registry.reload(Namespace::Commands, "ping").await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::MissingHandler { .. })
        ));
        assert!(registry.get(Namespace::Commands, "ping").unwrap().config.nsfw);

        assert!(matches!(
            registry.reload(Namespace::Commands, "nope").await,
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reload_cannot_rename_over_another_entry() {
        let dir = create_temp_dir();
        let ping = write_file(dir.path(), "commands/system/ping.toml", "run = \"noop\"");
        write_file(
            dir.path(),
            "commands/system/help.toml",
            "run = \"noop\"\n[data]\ndescription = \"real help\"",
        );
        let registry = CommandRegistry::new(loader(), Arc::new(FsModuleReader));
        registry.load_directory(dir.path()).await.unwrap();

        std::fs::write(&ping, "run = \"noop\"\n[data]\nname = \"help\"\ndescription = \"from ping\"").unwrap();
        let err = registry.reload(Namespace::Commands, "ping").await.unwrap_err();

        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::IdentifierChanged { ref renamed, .. }) if renamed == "help"
        ));
        assert!(registry.get(Namespace::Commands, "ping").is_some());
        assert_eq!(
            registry.get(Namespace::Commands, "help").unwrap().data.description,
            "real help"
        );
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reloads_keep_entries_apart() {
        let dir = create_temp_dir();
        let ping = write_file(dir.path(), "commands/system/ping.toml", "run = \"noop\"");
        let roll = write_file(dir.path(), "commands/fun/roll.toml", "run = \"noop\"");
        let registry = Arc::new(CommandRegistry::new(loader(), Arc::new(FsModuleReader)));
        registry.load_directory(dir.path()).await.unwrap();

        std::fs::write(&ping, "run = \"noop\"\n[data]\ndescription = \"Pong\"").unwrap();
        std::fs::write(&roll, "run = \"noop\"\n[config]\nnsfw = true\n[data]\ndescription = \"Dice\"").unwrap();

        for _ in 0..20 {
            let (a, b) = tokio::join!(
                tokio::spawn({
                    let registry = Arc::clone(&registry);
                    async move { registry.reload(Namespace::Commands, "ping").await }
                }),
                tokio::spawn({
                    let registry = Arc::clone(&registry);
                    async move { registry.reload(Namespace::Commands, "roll").await }
                }),
            );
            a.unwrap().unwrap();
            b.unwrap().unwrap();
        }

        let ping = registry.get(Namespace::Commands, "ping").unwrap();
        let roll = registry.get(Namespace::Commands, "roll").unwrap();
        assert_eq!(ping.data.description, "Pong");
        assert!(!ping.config.nsfw);
        assert_eq!(ping.category, "system");
        assert_eq!(roll.data.description, "Dice");
        assert!(roll.config.nsfw);
        assert_eq!(roll.category, "fun");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_uses_kind_namespace() {
        let registry = CommandRegistry::new(loader(), Arc::new(FsModuleReader));
        let mut descriptor = loader()
            .load(source("buttons/confirm/confirm_accept.toml", "run = \"noop\""))
            .unwrap();
        descriptor.namespace = Namespace::Buttons;
        registry.register(descriptor);

        assert!(registry.resolve(InvocationKind::Button, "confirm_accept").is_some());
        assert!(registry.resolve(InvocationKind::ChatInput, "confirm_accept").is_none());
        assert_eq!(registry.count(Namespace::Buttons), 1);
        assert_eq!(registry.len(), 1);
    }
}
