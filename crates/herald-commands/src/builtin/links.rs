use super::say;
use crate::context::{InvocationContext, Reply};
use crate::framework::{Data, Error};
use herald_i18n::keys;
use std::sync::Arc;

async fn send_link(
    data: &Data,
    ctx: &InvocationContext,
    link: Option<&str>,
    label: &str,
) -> Result<(), Error> {
    let reply = match link {
        Some(url) => Reply::new(url),
        None => Reply::ephemeral(say(data, ctx, keys::LINK_MISSING, &[("link", label)])),
    };
    ctx.reply(reply).await
}

/// Replies with the bot invite link.
pub async fn invite(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let config = data.config.get();
    send_link(&data, &ctx, config.links.invite.as_deref(), "invite").await
}

/// Replies with the support server link.
pub async fn support(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let config = data.config.get();
    send_link(&data, &ctx, config.links.support_server.as_deref(), "support server").await
}
