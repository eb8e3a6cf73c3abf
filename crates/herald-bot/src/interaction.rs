//! Conversion of serenity interactions into dispatcher events.

use async_trait::async_trait;
use herald_commands::{
    Button, ButtonStyle, Choice, Error, IncomingEvent, InvocationKind, Permissions, Reply,
    ResolvedCapabilities, Transport,
};
use herald_common::{ChannelId, GuildId, UserId};
use serenity::builder::{
    CreateActionRow, CreateAutocompleteResponse, CreateButton, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::client::Context;
use serenity::model::application::{
    CommandDataOptionValue, CommandInteraction, CommandType, ComponentInteraction,
    ComponentInteractionDataKind, Interaction, ModalInteraction,
};
use serenity::model::channel::Channel;
use serenity::model::guild::Member;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// The interaction a transport responds to.
#[derive(Debug, Clone)]
enum Target {
    Command(CommandInteraction),
    Component(ComponentInteraction),
    Modal(ModalInteraction),
}

/// Responds to one interaction through the Discord HTTP API.
pub struct SerenityTransport {
    http: Arc<serenity::http::Http>,
    target: Target,
    autocomplete: bool,
}

impl std::fmt::Debug for SerenityTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityTransport")
            .field("autocomplete", &self.autocomplete)
            .finish_non_exhaustive()
    }
}

fn button_style(style: ButtonStyle) -> serenity::model::application::ButtonStyle {
    use serenity::model::application::ButtonStyle as Style;
    match style {
        ButtonStyle::Primary => Style::Primary,
        ButtonStyle::Secondary => Style::Secondary,
        ButtonStyle::Success => Style::Success,
        ButtonStyle::Danger => Style::Danger,
    }
}

fn action_rows(buttons: &[Button]) -> Vec<CreateActionRow> {
    // Discord allows five buttons per row.
    buttons
        .chunks(5)
        .map(|row| {
            CreateActionRow::Buttons(
                row.iter()
                    .map(|b| {
                        CreateButton::new(&b.custom_id)
                            .label(&b.label)
                            .style(button_style(b.style))
                    })
                    .collect(),
            )
        })
        .collect()
}

#[async_trait]
impl Transport for SerenityTransport {
    fn is_replyable(&self) -> bool {
        !self.autocomplete
    }

    async fn reply(&self, reply: Reply) -> Result<(), Error> {
        let message = CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral)
            .components(action_rows(&reply.buttons));
        let response = CreateInteractionResponse::Message(message);
        match &self.target {
            Target::Command(i) => i.create_response(&self.http, response).await?,
            Target::Component(i) => i.create_response(&self.http, response).await?,
            Target::Modal(i) => i.create_response(&self.http, response).await?,
        }
        Ok(())
    }

    async fn edit_reply(&self, reply: Reply) -> Result<(), Error> {
        let edit = EditInteractionResponse::new()
            .content(reply.content)
            .components(action_rows(&reply.buttons));
        match &self.target {
            Target::Command(i) => i.edit_response(&self.http, edit).await?,
            Target::Component(i) => i.edit_response(&self.http, edit).await?,
            Target::Modal(i) => i.edit_response(&self.http, edit).await?,
        };
        Ok(())
    }

    async fn autocomplete(&self, choices: Vec<Choice>) -> Result<(), Error> {
        let Target::Command(interaction) = &self.target else {
            return Err("autocomplete answered on a non-command interaction".into());
        };
        let response = choices
            .into_iter()
            .fold(CreateAutocompleteResponse::new(), |response, choice| {
                response.add_string_choice(choice.name, choice.value)
            });
        interaction
            .create_response(&self.http, CreateInteractionResponse::Autocomplete(response))
            .await?;
        Ok(())
    }
}

/// Fields every interaction type carries.
struct Common<'a> {
    user: UserId,
    channel: ChannelId,
    guild: Option<GuildId>,
    member: Option<&'a Member>,
    app_permissions: Option<Permissions>,
}

fn option_string(value: &CommandDataOptionValue) -> Option<String> {
    match value {
        CommandDataOptionValue::String(s) => Some(s.clone()),
        CommandDataOptionValue::Integer(n) => Some(n.to_string()),
        CommandDataOptionValue::Number(n) => Some(n.to_string()),
        CommandDataOptionValue::Boolean(b) => Some(b.to_string()),
        CommandDataOptionValue::User(id) => Some(id.get().to_string()),
        CommandDataOptionValue::Channel(id) => Some(id.get().to_string()),
        CommandDataOptionValue::Role(id) => Some(id.get().to_string()),
        CommandDataOptionValue::Mentionable(id) => Some(id.get().to_string()),
        CommandDataOptionValue::Autocomplete { value, .. } => Some(value.clone()),
        _ => None,
    }
}

fn command_kind(interaction: &CommandInteraction, autocomplete: bool) -> InvocationKind {
    if autocomplete {
        return InvocationKind::Autocomplete;
    }
    match interaction.data.kind {
        CommandType::User => InvocationKind::UserContextMenu,
        CommandType::Message => InvocationKind::MessageContextMenu,
        _ => InvocationKind::ChatInput,
    }
}

/// Builds dispatcher events from gateway interactions.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    http: Arc<serenity::http::Http>,
    client: UserId,
}

impl EventBuilder {
    /// `client` is the bot's own user id.
    pub fn new(http: Arc<serenity::http::Http>, client: UserId) -> Self {
        Self { http, client }
    }

    /// Converts `interaction`; `None` for interaction types nothing handles.
    pub async fn build(&self, ctx: &Context, interaction: Interaction) -> Option<IncomingEvent> {
        let (kind, identifier, arguments, focused, component_owner, payload, target) =
            match interaction {
                Interaction::Command(i) | Interaction::Autocomplete(i)
                    if i.data.kind == CommandType::ChatInput
                        || i.data.kind == CommandType::User
                        || i.data.kind == CommandType::Message =>
                {
                    let autocomplete = i.data.autocomplete().is_some();
                    let arguments: BTreeMap<_, _> = i
                        .data
                        .options
                        .iter()
                        .filter_map(|o| option_string(&o.value).map(|v| (o.name.clone(), v)))
                        .collect();
                    let focused = i.data.autocomplete().map(|o| o.value.to_string());
                    let payload = serde_json::to_value(&i.data).unwrap_or_default();
                    (
                        command_kind(&i, autocomplete),
                        i.data.name.clone(),
                        arguments,
                        focused,
                        None,
                        payload,
                        Target::Command(i),
                    )
                }
                Interaction::Component(i) => {
                    let kind = match i.data.kind {
                        ComponentInteractionDataKind::Button => InvocationKind::Button,
                        _ => InvocationKind::SelectMenu,
                    };
                    #[allow(deprecated)]
                    let owner = i
                        .message
                        .interaction
                        .as_ref()
                        .map(|origin| UserId(origin.user.id.get()));
                    let payload = serde_json::to_value(&i.data).unwrap_or_default();
                    (
                        kind,
                        i.data.custom_id.clone(),
                        BTreeMap::new(),
                        None,
                        owner,
                        payload,
                        Target::Component(i),
                    )
                }
                Interaction::Modal(i) => {
                    let payload = serde_json::to_value(&i.data).unwrap_or_default();
                    (
                        InvocationKind::ModalSubmit,
                        i.data.custom_id.clone(),
                        BTreeMap::new(),
                        None,
                        None,
                        payload,
                        Target::Modal(i),
                    )
                }
                other => {
                    debug!(kind = ?other.kind(), "Ignoring interaction");
                    return None;
                }
            };

        let common = match &target {
            Target::Command(i) => Common {
                user: UserId(i.user.id.get()),
                channel: ChannelId(i.channel_id.get()),
                guild: i.guild_id.map(|g| GuildId(g.get())),
                member: i.member.as_deref(),
                app_permissions: i.app_permissions,
            },
            Target::Component(i) => Common {
                user: UserId(i.user.id.get()),
                channel: ChannelId(i.channel_id.get()),
                guild: i.guild_id.map(|g| GuildId(g.get())),
                member: i.member.as_ref(),
                app_permissions: i.app_permissions,
            },
            Target::Modal(i) => Common {
                user: UserId(i.user.id.get()),
                channel: ChannelId(i.channel_id.get()),
                guild: i.guild_id.map(|g| GuildId(g.get())),
                member: i.member.as_ref(),
                app_permissions: i.app_permissions,
            },
        };

        let mut capabilities = ResolvedCapabilities::new(Some(common.channel));
        if let Some(permissions) = common.member.and_then(|m| m.permissions) {
            capabilities = capabilities.with(common.user, permissions);
        }
        if let Some(permissions) = common.app_permissions {
            capabilities = capabilities.with(self.client, permissions);
        }

        let (guild_owner, channel_nsfw) = match common.guild {
            Some(guild) => (guild_owner(ctx, guild), channel_nsfw(ctx, common.channel).await),
            None => (None, false),
        };

        let (user, channel, guild) = (common.user, common.channel, common.guild);
        Some(IncomingEvent {
            kind,
            identifier,
            user,
            channel,
            guild,
            guild_owner,
            channel_nsfw,
            arguments,
            focused,
            component_owner,
            payload,
            transport: Arc::new(SerenityTransport {
                http: Arc::clone(&self.http),
                autocomplete: kind == InvocationKind::Autocomplete,
                target,
            }),
            capabilities: Arc::new(capabilities),
        })
    }
}

fn guild_owner(ctx: &Context, guild: GuildId) -> Option<UserId> {
    serenity::model::id::GuildId::new(guild.get())
        .to_guild_cached(&ctx.cache)
        .map(|g| UserId(g.owner_id.get()))
}

async fn channel_nsfw(ctx: &Context, channel: ChannelId) -> bool {
    match serenity::model::id::ChannelId::new(channel.get())
        .to_channel(ctx)
        .await
    {
        Ok(Channel::Guild(channel)) => channel.nsfw,
        Ok(_) => false,
        Err(e) => {
            debug!("Could not resolve channel {channel}: {e}");
            false
        }
    }
}
