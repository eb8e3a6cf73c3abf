//! Validated in-memory representation of commands and component handlers.

use crate::capability::{capability_names, Permissions};
use crate::framework::CommandHandler;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Collection a descriptor belongs to. Identifiers are unique per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Namespace {
    /// Slash commands.
    Commands,
    /// User and message context menu actions.
    ContextMenus,
    /// Button components, keyed by custom id.
    Buttons,
    /// Modal submissions, keyed by custom id.
    Modals,
    /// Select menu components, keyed by custom id.
    SelectMenus,
    /// Autocomplete providers, keyed by the command they complete.
    AutoComplete,
}

impl Namespace {
    /// Every namespace, in discovery order.
    pub const ALL: [Self; 6] = [
        Self::Commands,
        Self::ContextMenus,
        Self::Buttons,
        Self::Modals,
        Self::SelectMenus,
        Self::AutoComplete,
    ];

    /// Directory and URL segment name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::ContextMenus => "context-menus",
            Self::Buttons => "buttons",
            Self::Modals => "modals",
            Self::SelectMenus => "select-menus",
            Self::AutoComplete => "auto-complete",
        }
    }

    /// Whether entries are pushed to the remote application command registry.
    pub const fn is_application_command(self) -> bool {
        matches!(self, Self::Commands | Self::ContextMenus)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| format!("unknown namespace: {s}"))
    }
}

/// Application command type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    /// Slash command with a description and options.
    #[default]
    ChatInput,
    /// Context menu action on a user.
    User,
    /// Context menu action on a message.
    Message,
}

/// Slash command option value type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    /// Free text.
    #[default]
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Number,
    /// True or false.
    Boolean,
    /// A user.
    User,
    /// A channel.
    Channel,
    /// A role.
    Role,
    /// A user or a role.
    Mentionable,
}

/// A fixed choice offered for an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    /// Label shown in the client.
    pub name: String,
    /// Value sent to the handler; parsed for numeric options.
    pub value: String,
}

/// A slash command option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOption {
    /// Name sent to Discord.
    pub name: String,
    /// Description shown in the client.
    pub description: String,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: OptionKind,
    /// Whether the option must be filled in.
    pub required: bool,
    /// Whether values are suggested by an autocomplete provider.
    pub autocomplete: bool,
    /// Fixed choices; none means free input.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    /// Lower bound for numeric options.
    pub min_value: Option<f64>,
    /// Upper bound for numeric options.
    pub max_value: Option<f64>,
}

/// Public API data: what the listing API serves and what is pushed to Discord.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandData {
    /// Name sent to Discord.
    pub name: String,
    /// Description shown in the client.
    pub description: String,
    /// Help category; defaults to the parent directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Application command type.
    #[serde(rename = "type")]
    pub kind: CommandKind,
    /// Slash command options.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

/// Which identifiers a cooldown is counted against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CooldownScope {
    /// The caller, across every guild.
    PerCaller,
    /// The caller within one guild.
    #[default]
    PerCallerInContext,
    /// Everyone in one guild.
    PerContext,
    /// Everyone in one channel.
    PerChannel,
    /// Everyone, everywhere.
    Global,
}

impl CooldownScope {
    /// Wording used in help output.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::PerCaller => "per user",
            Self::PerCallerInContext => "per user in each server",
            Self::PerContext => "per server",
            Self::PerChannel => "per channel",
            Self::Global => "globally",
        }
    }
}

/// A resolved cooldown: at most `usages` invocations per `window_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cooldown {
    /// Which identifiers share the quota.
    pub scope: CooldownScope,
    /// Invocations allowed per window.
    pub usages: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Cooldown {
    /// Window length in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_seconds(&self) -> f64 {
        self.window_ms as f64 / 1000.0
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self {
            scope: CooldownScope::PerCallerInContext,
            usages: 1,
            window_ms: 2_000,
        }
    }
}

/// Cooldown as written in a declaration: `cooldown = false` or a table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CooldownDecl {
    /// `true` takes the default cooldown, `false` disables it.
    Toggle(bool),
    /// Explicit settings.
    Settings(CooldownSettings),
}

/// Partial cooldown settings; missing fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CooldownSettings {
    /// Which identifiers share the quota.
    pub scope: Option<CooldownScope>,
    /// Invocations allowed per window.
    pub usages: Option<i64>,
    /// Window length in seconds; fractions are allowed.
    pub duration: Option<f64>,
}

/// Resolved client-side configuration of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandConfig {
    /// Disabled entries are rejected at dispatch.
    pub enabled: bool,
    /// Minimum level of the caller.
    pub permission_level: u8,
    /// Name of `permission_level`.
    pub permission_name: String,
    /// Capabilities the bot needs in the channel.
    #[serde(serialize_with = "serialize_capabilities")]
    pub client_capabilities: Permissions,
    /// Capabilities the caller needs in the channel.
    #[serde(serialize_with = "serialize_capabilities")]
    pub caller_capabilities: Permissions,
    /// Only runs in age restricted channels.
    pub nsfw: bool,
    /// Rate limit; `None` disables throttling.
    pub cooldown: Option<Cooldown>,
    /// Registered globally instead of in the test guild.
    pub global: bool,
}

fn serialize_capabilities<S: Serializer>(value: &Permissions, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(capability_names(*value))
}

/// A validated command or component handler.
pub struct CommandDescriptor {
    /// Namespace the entry is registered in.
    pub namespace: Namespace,
    /// Name or custom id, unique per namespace.
    pub identifier: String,
    /// Help category.
    pub category: String,
    /// Resolved configuration.
    pub config: CommandConfig,
    /// Public data with the resolved name and category.
    pub data: CommandData,
    /// Catalog name of the handler.
    pub handler_name: String,
    /// The handler itself.
    pub handler: Arc<dyn CommandHandler>,
    /// Declaration file the descriptor was loaded from.
    pub origin: PathBuf,
}

impl CommandDescriptor {
    /// Registry key.
    pub fn key(&self) -> (Namespace, String) {
        (self.namespace, self.identifier.clone())
    }

    /// The view served by the listing API; the origin path is left out.
    pub fn listing(&self) -> CommandListing<'_> {
        CommandListing {
            data: &self.data,
            config: &self.config,
        }
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("namespace", &self.namespace)
            .field("identifier", &self.identifier)
            .field("category", &self.category)
            .field("config", &self.config)
            .field("handler", &self.handler_name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Serializable public view of a descriptor.
#[derive(Debug, Serialize)]
pub struct CommandListing<'a> {
    /// Public data.
    pub data: &'a CommandData,
    /// Resolved configuration.
    pub config: &'a CommandConfig,
}
