use super::say;
use crate::context::{InvocationContext, Reply};
use crate::framework::{Data, Error};
use herald_i18n::keys;
use std::sync::Arc;

/// Tells the caller their permission level.
pub async fn permlevel(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let level = ctx.permission_level.to_string();
    let name = data
        .permissions
        .name_for_level(ctx.permission_level)
        .unwrap_or("Unknown");
    let content = say(&data, &ctx, keys::PERMLEVEL, &[("level", level.as_str()), ("name", name)]);
    ctx.reply(Reply::ephemeral(content)).await
}
