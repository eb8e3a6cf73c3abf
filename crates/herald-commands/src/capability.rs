//! Capability (Discord permission flag) queries used by permission rules and eligibility checks.

use herald_common::{to_screaming_snake, ChannelId, UserId};
pub use serenity::model::permissions::Permissions;
use std::collections::HashMap;

/// Result of asking whether an entity holds a set of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityCheck {
    /// Every requested capability is held.
    Granted,
    /// The capabilities that are not held.
    Missing(Permissions),
}

impl CapabilityCheck {
    /// Compares what an entity holds against what is required.
    ///
    /// Administrators implicitly hold every capability.
    pub fn evaluate(held: Permissions, required: Permissions) -> Self {
        if held.contains(Permissions::ADMINISTRATOR) {
            return Self::Granted;
        }
        let missing = required - held;
        if missing.is_empty() {
            Self::Granted
        } else {
            Self::Missing(missing)
        }
    }

    /// Whether the check passed.
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Answers capability questions for an entity in a channel.
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityQuery: Send + Sync {
    /// Checks `required` for `entity`; a missing channel means nothing can be granted.
    fn check(&self, entity: UserId, channel: Option<ChannelId>, required: Permissions)
        -> CapabilityCheck;
}

/// Capabilities already resolved for the entities of one event.
///
/// Interaction payloads carry the invoking member's and the application's channel
/// permissions, so no further lookups are needed while dispatching.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCapabilities {
    channel: Option<ChannelId>,
    held: HashMap<UserId, Permissions>,
}

impl ResolvedCapabilities {
    /// Creates an empty set for `channel`.
    pub fn new(channel: Option<ChannelId>) -> Self {
        Self {
            channel,
            held: HashMap::new(),
        }
    }

    /// Records what `entity` holds in the channel.
    #[must_use]
    pub fn with(mut self, entity: UserId, permissions: Permissions) -> Self {
        self.held.insert(entity, permissions);
        self
    }
}

impl CapabilityQuery for ResolvedCapabilities {
    fn check(
        &self,
        entity: UserId,
        channel: Option<ChannelId>,
        required: Permissions,
    ) -> CapabilityCheck {
        if required.is_empty() {
            return CapabilityCheck::Granted;
        }
        if channel.is_none() || channel != self.channel {
            return CapabilityCheck::Missing(required);
        }
        let held = self.held.get(&entity).copied().unwrap_or_else(Permissions::empty);
        CapabilityCheck::evaluate(held, required)
    }
}

/// Parses a capability name in either `KickMembers` or `KICK_MEMBERS` form.
pub fn parse_capability(name: &str) -> Option<Permissions> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Permissions::from_name(name).or_else(|| Permissions::from_name(&to_screaming_snake(name)))
}

/// Human readable capability names, e.g. `"Kick Members, Ban Members"`.
pub fn describe_capabilities(permissions: Permissions) -> String {
    permissions.get_permission_names().join(", ")
}

/// Upper snake case names of every flag in `permissions`.
pub fn capability_names(permissions: Permissions) -> Vec<String> {
    permissions
        .iter_names()
        .map(|(name, _)| name.to_string())
        .collect()
}
