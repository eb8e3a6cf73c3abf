//! Incoming events, the per-invocation context and the reply transport.

use crate::capability::CapabilityQuery;
use crate::descriptor::Namespace;
use crate::framework::Error;
use async_trait::async_trait;
use herald_common::{ChannelId, GuildId, UserId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The kind of interaction being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationKind {
    /// Slash command.
    ChatInput,
    /// User context menu action.
    UserContextMenu,
    /// Message context menu action.
    MessageContextMenu,
    /// Button press.
    Button,
    /// Select menu choice.
    SelectMenu,
    /// Modal submission.
    ModalSubmit,
    /// Autocomplete request for a focused option.
    Autocomplete,
}

impl InvocationKind {
    /// Namespace searched for the activity identifier.
    pub const fn namespace(self) -> Namespace {
        match self {
            Self::ChatInput => Namespace::Commands,
            Self::UserContextMenu | Self::MessageContextMenu => Namespace::ContextMenus,
            Self::Button => Namespace::Buttons,
            Self::SelectMenu => Namespace::SelectMenus,
            Self::ModalSubmit => Namespace::Modals,
            Self::Autocomplete => Namespace::AutoComplete,
        }
    }

    /// Message components attached to an earlier response.
    pub const fn is_component(self) -> bool {
        matches!(self, Self::Button | Self::SelectMenu)
    }
}

/// Visual style of a reply button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Blurple.
    Primary,
    /// Grey.
    Secondary,
    /// Green.
    Success,
    /// Red.
    Danger,
}

/// A button attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Identifier routed to the buttons namespace.
    pub custom_id: String,
    /// Text on the button.
    pub label: String,
    /// Colour of the button.
    pub style: ButtonStyle,
}

impl Button {
    /// Creates a button.
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style,
        }
    }
}

/// Content sent back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Message text.
    pub content: String,
    /// Only the caller sees the message.
    pub ephemeral: bool,
    /// Buttons below the message.
    pub buttons: Vec<Button>,
}

impl Reply {
    /// A reply visible to everyone in the channel.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// A reply only the caller can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
            buttons: Vec::new(),
        }
    }

    /// Appends a button.
    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }
}

/// An autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Label shown to the user.
    pub name: String,
    /// Value filled into the option.
    pub value: String,
}

impl Choice {
    /// Creates a choice.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Maximum number of autocomplete choices Discord accepts.
pub const MAX_CHOICES: usize = 25;

/// Sends responses for one interaction.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether the interaction can still receive a reply.
    fn is_replyable(&self) -> bool;

    /// Sends the initial response.
    async fn reply(&self, reply: Reply) -> Result<(), Error>;

    /// Replaces the initial response.
    async fn edit_reply(&self, reply: Reply) -> Result<(), Error>;

    /// Answers an autocomplete request.
    async fn autocomplete(&self, choices: Vec<Choice>) -> Result<(), Error>;
}

/// An event as handed over by the gateway adapter.
#[derive(Clone)]
pub struct IncomingEvent {
    /// What kind of interaction this is.
    pub kind: InvocationKind,
    /// Command name or component custom id.
    pub identifier: String,
    /// The caller.
    pub user: UserId,
    /// Channel the interaction came from.
    pub channel: ChannelId,
    /// Guild, `None` in direct messages.
    pub guild: Option<GuildId>,
    /// Owner of the guild, when known.
    pub guild_owner: Option<UserId>,
    /// Whether the channel is age restricted.
    pub channel_nsfw: bool,
    /// Option values by name.
    pub arguments: BTreeMap<String, String>,
    /// Current value of the focused option for autocomplete.
    pub focused: Option<String>,
    /// User of the interaction that created the message a component is attached to.
    pub component_owner: Option<UserId>,
    /// Raw interaction data.
    pub payload: serde_json::Value,
    /// Where responses go.
    pub transport: Arc<dyn Transport>,
    /// Capabilities of the caller and the client in the channel.
    pub capabilities: Arc<dyn CapabilityQuery>,
}

/// Everything a handler knows about the invocation it serves.
#[derive(Clone)]
pub struct InvocationContext {
    /// Correlates log lines of one dispatch.
    pub id: Uuid,
    /// What kind of interaction this is.
    pub kind: InvocationKind,
    /// Command name or component custom id.
    pub identifier: String,
    /// The caller.
    pub user: UserId,
    /// Channel the interaction came from.
    pub channel: ChannelId,
    /// Guild, `None` in direct messages.
    pub guild: Option<GuildId>,
    /// Owner of the guild, when known.
    pub guild_owner: Option<UserId>,
    /// Resolved permission level of the caller.
    pub permission_level: u8,
    /// Whether the channel is age restricted.
    pub channel_nsfw: bool,
    /// Option values by name.
    pub arguments: BTreeMap<String, String>,
    /// Current value of the focused option for autocomplete.
    pub focused: Option<String>,
    /// User of the interaction that created the message a component is attached to.
    pub component_owner: Option<UserId>,
    /// Raw interaction data.
    pub payload: serde_json::Value,
    /// Where responses go.
    pub transport: Arc<dyn Transport>,
    /// Capabilities of the caller and the client in the channel.
    pub capabilities: Arc<dyn CapabilityQuery>,
}

impl InvocationContext {
    /// Builds the handler context once the caller's level is known.
    pub fn from_event(event: IncomingEvent, id: Uuid, permission_level: u8) -> Self {
        Self {
            id,
            kind: event.kind,
            identifier: event.identifier,
            user: event.user,
            channel: event.channel,
            guild: event.guild,
            guild_owner: event.guild_owner,
            permission_level,
            channel_nsfw: event.channel_nsfw,
            arguments: event.arguments,
            focused: event.focused,
            component_owner: event.component_owner,
            payload: event.payload,
            transport: event.transport,
            capabilities: event.capabilities,
        }
    }

    /// String value of an option.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(String::as_str)
    }

    /// Mention of the caller, used as the first word of replies.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user)
    }

    /// Mention of the channel.
    pub fn channel_mention(&self) -> String {
        format!("<#{}>", self.channel)
    }

    /// Sends the initial response.
    pub async fn reply(&self, reply: Reply) -> Result<(), Error> {
        self.transport.reply(reply).await
    }

    /// Replaces the initial response.
    pub async fn edit_reply(&self, reply: Reply) -> Result<(), Error> {
        self.transport.edit_reply(reply).await
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("identifier", &self.identifier)
            .field("user", &self.user)
            .field("channel", &self.channel)
            .field("guild", &self.guild)
            .field("permission_level", &self.permission_level)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for IncomingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingEvent")
            .field("kind", &self.kind)
            .field("identifier", &self.identifier)
            .field("user", &self.user)
            .field("channel", &self.channel)
            .field("guild", &self.guild)
            .finish_non_exhaustive()
    }
}
