use super::say;
use crate::context::{InvocationContext, Reply};
use crate::framework::{Data, Error};
use crate::gateway::resident_memory_bytes;
use chrono::Utc;
use herald_common::format_duration_secs;
use herald_i18n::keys;
use std::sync::Arc;
use std::time::Duration;

/// Traffic light for a round trip time.
pub(super) fn latency_status(latency: Option<Duration>) -> &'static str {
    match latency.map(|l| l.as_millis()) {
        None => "⚪",
        Some(0..=250) => "🟢",
        Some(251..=500) => "🟡",
        Some(501..=1000) => "🟠",
        Some(_) => "🔴",
    }
}

/// Status light and rendered gateway latency.
pub(super) fn latency_fields(data: &Data) -> (&'static str, String) {
    let latency = data.gateway.latency();
    let text = latency.map_or_else(
        || data.messages.get(keys::LATENCY_UNKNOWN),
        |l| format!("{} ms", l.as_millis()),
    );
    (latency_status(latency), text)
}

/// Time since start, rendered.
pub(super) fn uptime(data: &Data) -> String {
    let seconds = u64::try_from((Utc::now() - data.started_at).num_seconds()).unwrap_or(0);
    format_duration_secs(seconds)
}

#[allow(clippy::cast_precision_loss)]
fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Shows latency, memory, uptime and reach of the bot.
pub async fn stats(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let (status, latency) = latency_fields(&data);
    let memory = resident_memory_bytes()
        .map_or_else(|| data.messages.get(keys::MEMORY_UNAVAILABLE), format_megabytes);
    let uptime = uptime(&data);
    let servers = data.gateway.guild_count().to_string();
    let users = data.gateway.member_count().to_string();

    let content = say(
        &data,
        &ctx,
        keys::STATS,
        &[
            ("version", env!("CARGO_PKG_VERSION")),
            ("latency_status", status),
            ("latency", latency.as_str()),
            ("memory", memory.as_str()),
            ("uptime", uptime.as_str()),
            ("servers", servers.as_str()),
            ("users", users.as_str()),
        ],
    );
    ctx.reply(Reply::new(content)).await
}
