//! Live figures about the gateway connection and the running process.
//!
//! The Discord adapter feeds [`GatewayStats`] from gateway events; handlers only read it.

use dashmap::DashMap;
use herald_common::GuildId;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const UNKNOWN_LATENCY: u64 = u64::MAX;

/// Guild membership and heartbeat latency as last reported by the gateway.
#[derive(Debug)]
pub struct GatewayStats {
    latency_ms: AtomicU64,
    guilds: DashMap<GuildId, u64>,
}

impl GatewayStats {
    /// No guilds and no latency sample yet.
    pub fn new() -> Self {
        Self {
            latency_ms: AtomicU64::new(UNKNOWN_LATENCY),
            guilds: DashMap::new(),
        }
    }

    /// Records the latest heartbeat round trip; `None` until the shard has one.
    pub fn set_latency(&self, latency: Option<Duration>) {
        let millis = latency.map_or(UNKNOWN_LATENCY, |l| {
            u64::try_from(l.as_millis()).unwrap_or(UNKNOWN_LATENCY - 1)
        });
        self.latency_ms.store(millis, Ordering::Relaxed);
    }

    /// Latest heartbeat round trip.
    pub fn latency(&self) -> Option<Duration> {
        match self.latency_ms.load(Ordering::Relaxed) {
            UNKNOWN_LATENCY => None,
            millis => Some(Duration::from_millis(millis)),
        }
    }

    /// Records a guild becoming available, or its member count changing.
    pub fn guild_available(&self, guild: GuildId, members: u64) {
        self.guilds.insert(guild, members);
    }

    /// Forgets a guild the bot was removed from.
    pub fn guild_removed(&self, guild: GuildId) {
        self.guilds.remove(&guild);
    }

    /// Guilds the bot is in.
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    /// Members summed over every guild; users in several guilds count once per guild.
    pub fn member_count(&self) -> u64 {
        self.guilds.iter().map(|entry| *entry.value()).sum()
    }
}

impl Default for GatewayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Resident set size of this process, where procfs is available.
pub fn resident_memory_bytes() -> Option<u64> {
    read_resident_memory(Path::new("/proc/self/status"))
}

fn read_resident_memory(status: &Path) -> Option<u64> {
    std::fs::read_to_string(status)
        .ok()
        .and_then(|content| parse_vm_rss(&content))
}

/// Extracts `VmRSS` from `/proc/<pid>/status` content, in bytes.
fn parse_vm_rss(content: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        let value = line.strip_prefix("VmRSS:")?.trim();
        let kib = value.strip_suffix("kB").unwrap_or(value).trim();
        kib.parse::<u64>().ok().map(|kib| kib.saturating_mul(1024))
    })
}
