use super::stats::{latency_fields, uptime};
use super::say;
use crate::context::{InvocationContext, Reply};
use crate::descriptor::Namespace;
use crate::framework::{Data, Error};
use herald_i18n::keys;
use std::sync::Arc;

/// Shows gateway latency, uptime and registry statistics.
pub async fn ping(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let (status, latency) = latency_fields(&data);
    let commands = data.registry.count(Namespace::Commands) + data.registry.count(Namespace::ContextMenus);
    let components = data.registry.len().saturating_sub(commands);
    let (uptime, commands, components, throttle_keys) = (
        uptime(&data),
        commands.to_string(),
        components.to_string(),
        data.throttle.active_keys().to_string(),
    );

    let content = say(
        &data,
        &ctx,
        keys::PING,
        &[
            ("latency_status", status),
            ("latency", latency.as_str()),
            ("uptime", uptime.as_str()),
            ("commands", commands.as_str()),
            ("components", components.as_str()),
            ("throttle_keys", throttle_keys.as_str()),
        ],
    );
    ctx.reply(Reply::new(content)).await
}
