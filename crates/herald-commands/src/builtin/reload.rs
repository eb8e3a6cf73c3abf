use super::say;
use crate::context::{Choice, InvocationContext, Reply, MAX_CHOICES};
use crate::descriptor::Namespace;
use crate::framework::{Data, Error};
use herald_i18n::keys;
use std::sync::Arc;
use tracing::error;

/// Re-reads one command's declaration and swaps it in place.
pub async fn reload(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let name = ctx.argument("command").unwrap_or_default().trim().to_lowercase();

    let content = if data.registry.get(Namespace::Commands, &name).is_none() {
        say(&data, &ctx, keys::RELOAD_NOT_FOUND, &[("command", name.as_str())])
    } else {
        match data.registry.reload(Namespace::Commands, &name).await {
            Ok(descriptor) => {
                data.throttle.clear_command(&descriptor.identifier);
                say(
                    &data,
                    &ctx,
                    keys::RELOAD_SUCCESS,
                    &[("command", descriptor.identifier.as_str())],
                )
            }
            Err(e) => {
                error!(command = %name, "Failed to reload command: {e}");
                let reason = e.to_string();
                say(
                    &data,
                    &ctx,
                    keys::RELOAD_FAILED,
                    &[("command", name.as_str()), ("error", reason.as_str())],
                )
            }
        }
    };
    ctx.reply(Reply::ephemeral(content)).await
}

/// Suggests loaded command names containing the typed text.
pub async fn reload_autocomplete(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let query = ctx.focused.as_deref().unwrap_or_default().to_lowercase();
    let mut names: Vec<_> = data
        .registry
        .list(Namespace::Commands)
        .into_iter()
        .map(|d| d.identifier.clone())
        .filter(|name| name.contains(&query))
        .collect();
    names.sort();

    let choices = names
        .into_iter()
        .take(MAX_CHOICES)
        .map(|name| Choice::new(name.clone(), name))
        .collect();
    ctx.transport.autocomplete(choices).await
}
