use super::say;
use crate::context::{InvocationContext, Reply};
use crate::framework::{Data, Error};
use herald_i18n::keys;
use std::sync::Arc;

/// Custom id of the accepting prompt button.
pub const CONFIRM_ACCEPT: &str = "confirm_accept";
/// Custom id of the declining prompt button.
pub const CONFIRM_DECLINE: &str = "confirm_decline";

/// Hands a prompt button press to the handler waiting on it.
pub async fn confirm_prompt(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let delivered = data
        .prompts
        .answer(ctx.user, ctx.channel, ctx.identifier.clone());
    let key = if delivered {
        keys::PROMPT_ANSWERED
    } else {
        keys::PROMPT_EXPIRED
    };
    ctx.reply(Reply::ephemeral(say(&data, &ctx, key, &[]))).await
}
