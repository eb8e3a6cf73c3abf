use super::say;
use crate::context::{Choice, InvocationContext, Reply, MAX_CHOICES};
use crate::descriptor::{CommandDescriptor, Cooldown, Namespace};
use crate::framework::{Data, Error};
use crate::capability::describe_capabilities;
use herald_common::{title_case, truncate_string, GuildId};
use herald_i18n::keys;
use std::fmt::Write;
use std::sync::Arc;

const MAX_REPLY_LENGTH: usize = 2000;

/// Commands the caller may see: enabled, within their level, and deployed where they are.
fn visible_commands(data: &Data, ctx: &InvocationContext, test_guild: Option<GuildId>) -> Vec<Arc<CommandDescriptor>> {
    data.registry
        .list(Namespace::Commands)
        .into_iter()
        .filter(|d| {
            d.config.enabled
                && ctx.permission_level >= d.config.permission_level
                && (d.config.global || (ctx.guild.is_some() && ctx.guild == test_guild))
        })
        .collect()
}

fn describe_cooldown(cooldown: Option<&Cooldown>) -> String {
    let Some(cooldown) = cooldown else {
        return "None".to_string();
    };
    let times = match cooldown.usages {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        n => format!("{n} times"),
    };
    let unit = if cooldown.window_ms == 1_000 { "second" } else { "seconds" };
    format!(
        "{times} every {} {unit} {}",
        cooldown.duration_seconds(),
        cooldown.scope.describe()
    )
}

fn describe_command(descriptor: &CommandDescriptor) -> String {
    let config = &descriptor.config;
    let capabilities = |p| {
        let names = describe_capabilities(p);
        if names.is_empty() { "None".to_string() } else { names }
    };
    format!(
        "**/{}**\n{}\n\nCategory: {}\nRequired level: {}\nCooldown: {}\nBot permissions: {}\nYour permissions: {}\nSFW: {}",
        descriptor.identifier,
        descriptor.data.description,
        title_case(&descriptor.category),
        config.permission_name,
        describe_cooldown(config.cooldown.as_ref()),
        capabilities(config.client_capabilities),
        capabilities(config.caller_capabilities),
        if config.nsfw { "No" } else { "Yes" },
    )
}

fn overview(commands: &[Arc<CommandDescriptor>]) -> String {
    let mut out = String::new();
    let mut current: Option<&str> = None;
    for descriptor in commands {
        if current != Some(descriptor.category.as_str()) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "**{}**", title_case(&descriptor.category));
            current = Some(descriptor.category.as_str());
        }
        let _ = writeln!(out, "`/{}` - {}", descriptor.identifier, descriptor.data.description);
    }
    out
}

/// Lists available commands, or details one of them.
pub async fn help(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let config = data.config.get();
    let visible = visible_commands(&data, &ctx, config.discord.test_guild_id);

    let content = match ctx.argument("command").map(str::trim) {
        Some(name) if !name.is_empty() => visible
            .iter()
            .find(|d| d.identifier.eq_ignore_ascii_case(name))
            .map_or_else(
                || say(&data, &ctx, keys::COMMAND_UNAVAILABLE, &[]),
                |d| describe_command(d),
            ),
        _ => overview(&visible),
    };
    ctx.reply(Reply::ephemeral(truncate_string(&content, MAX_REPLY_LENGTH)))
        .await
}

/// Suggests visible commands whose name or category contains the typed text.
pub async fn help_autocomplete(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let config = data.config.get();
    let query = ctx.focused.as_deref().unwrap_or_default().to_lowercase();

    let mut matches: Vec<_> = visible_commands(&data, &ctx, config.discord.test_guild_id)
        .into_iter()
        .filter(|d| {
            d.identifier.to_lowercase().contains(&query) || d.category.to_lowercase().contains(&query)
        })
        .collect();
    matches.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    let choices = matches
        .iter()
        .take(MAX_CHOICES)
        .map(|d| Choice::new(format!("/{} ({})", d.identifier, title_case(&d.category)), d.identifier.clone()))
        .collect();
    ctx.transport.autocomplete(choices).await
}
