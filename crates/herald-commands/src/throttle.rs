//! Sliding window rate limiting of command usage.

use crate::context::InvocationContext;
use crate::descriptor::{CommandDescriptor, CooldownScope};
use dashmap::DashMap;
use herald_common::UserId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

/// Source of the current time in milliseconds since the epoch.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// A clock stopped at `start_millis`.
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    /// Moves the clock to `millis`.
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Identifies whose usages are counted together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    /// Set for scopes counted per caller.
    user: Option<UserId>,
    prefix: String,
    identifier: String,
}

impl ThrottleKey {
    /// Builds the key for `identifier` under `scope` for the invocation.
    pub fn new(scope: CooldownScope, identifier: &str, ctx: &InvocationContext) -> Self {
        let context = ctx.guild.map_or_else(|| ctx.channel.get(), |guild| guild.get());
        let (user, prefix) = match scope {
            CooldownScope::PerCaller => (Some(ctx.user), ctx.user.to_string()),
            CooldownScope::PerCallerInContext => (Some(ctx.user), format!("{}-{context}", ctx.user)),
            CooldownScope::PerContext => (None, context.to_string()),
            CooldownScope::PerChannel => (None, ctx.channel.to_string()),
            CooldownScope::Global => (None, String::new()),
        };
        Self {
            user,
            prefix,
            identifier: identifier.to_string(),
        }
    }

    /// Identifier the usages are counted for.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for ThrottleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.identifier)
    }
}

/// Answer of the throttle engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleVerdict {
    /// The usage was recorded.
    Allowed,
    /// The quota is used up.
    Denied {
        /// Seconds until the oldest usage leaves the window, to two decimals.
        retry_after_seconds: f64,
    },
}

impl ThrottleVerdict {
    /// Whether the invocation may proceed.
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug)]
struct ThrottleRecord {
    window_ms: u64,
    timestamps: Vec<u64>,
}

impl ThrottleRecord {
    fn live(&self, now: u64) -> impl Iterator<Item = u64> + '_ {
        let window = self.window_ms;
        self.timestamps
            .iter()
            .copied()
            .filter(move |t| now.saturating_sub(*t) < window)
    }
}

/// Tracks usage timestamps per throttle key.
pub struct ThrottleEngine {
    records: DashMap<ThrottleKey, ThrottleRecord>,
    clock: Arc<dyn Clock>,
}

impl ThrottleEngine {
    /// Creates an engine on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an engine reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Checks the descriptor's cooldown for the invocation and records the usage when allowed.
    ///
    /// The check and the append happen under the entry lock of the key, so racing
    /// invocations on one key never exceed the quota.
    pub fn check_and_record(
        &self,
        descriptor: &CommandDescriptor,
        ctx: &InvocationContext,
    ) -> ThrottleVerdict {
        let Some(cooldown) = descriptor.config.cooldown else {
            return ThrottleVerdict::Allowed;
        };
        let window_ms = cooldown.window_ms;
        if window_ms == 0 {
            return ThrottleVerdict::Allowed;
        }

        let key = ThrottleKey::new(cooldown.scope, &descriptor.identifier, ctx);
        let now = self.clock.now_millis();

        let mut record = self.records.entry(key).or_insert_with(|| ThrottleRecord {
            window_ms,
            timestamps: Vec::new(),
        });
        record.window_ms = window_ms;
        record.timestamps.retain(|t| now.saturating_sub(*t) < window_ms);

        if record.timestamps.len() < cooldown.usages as usize {
            record.timestamps.push(now);
            return ThrottleVerdict::Allowed;
        }

        let oldest = record.timestamps.iter().copied().min().unwrap_or(now);
        let remaining_ms = oldest.saturating_add(window_ms).saturating_sub(now);
        #[allow(clippy::cast_precision_loss)]
        let retry_after_seconds = ((remaining_ms as f64 / 1000.0) * 100.0).round() / 100.0;
        ThrottleVerdict::Denied {
            retry_after_seconds,
        }
    }

    /// Drops keys whose usages have all expired, returning how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let before = self.records.len();
        self.records.retain(|_, record| {
            let window = record.window_ms;
            record.timestamps.retain(|t| now.saturating_sub(*t) < window);
            !record.timestamps.is_empty()
        });
        before.saturating_sub(self.records.len())
    }

    /// Live usages recorded for `key`.
    pub fn usage_count(&self, key: &ThrottleKey) -> usize {
        let now = self.clock.now_millis();
        self.records
            .get(key)
            .map_or(0, |record| record.live(now).count())
    }

    /// Forgets every usage of `identifier`.
    pub fn clear_command(&self, identifier: &str) {
        self.records.retain(|key, _| key.identifier != identifier);
        debug!("Cleared all throttle records for command '{}'", identifier);
    }

    /// Forgets every per-caller usage of `user`.
    pub fn clear_user(&self, user: UserId) {
        self.records.retain(|key, _| key.user != Some(user));
        debug!("Cleared all throttle records for user {}", user);
    }

    /// Number of keys currently tracked.
    pub fn active_keys(&self) -> usize {
        self.records.len()
    }
}

impl Default for ThrottleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThrottleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrottleEngine")
            .field("active_keys", &self.records.len())
            .finish_non_exhaustive()
    }
}

/// Start background task for periodic removal of expired throttle keys.
pub fn start_throttle_sweep_task(
    engine: Arc<ThrottleEngine>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval(every);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = engine.sweep_expired();
            if removed > 0 {
                debug!(removed, remaining = engine.active_keys(), "Swept expired throttle keys");
            }
        }
    })
}
