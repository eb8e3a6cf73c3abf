//! Permission levels computed from a declarative, ordered rule table.

use crate::capability::{CapabilityQuery, Permissions};
use herald_common::{ChannelId, GuildId, UserId};
use herald_config::PermissionsConfig;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Levels of the default table.
pub mod levels {
    /// Everyone.
    pub const USER: u8 = 0;
    /// Members who can both kick and ban in the channel.
    pub const MODERATOR: u8 = 1;
    /// Members with the administrator capability in the channel.
    pub const ADMINISTRATOR: u8 = 2;
    /// The owner of the guild.
    pub const SERVER_OWNER: u8 = 3;
    /// Configured developers.
    pub const DEVELOPER: u8 = 4;
    /// The configured bot owner.
    pub const BOT_OWNER: u8 = 5;
}

/// Errors raised while building a permission table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionTableError {
    /// No rules were given.
    #[error("A permission table needs at least one rule")]
    Empty,
    /// Two rules share a level.
    #[error("Permission level {0} is defined more than once")]
    DuplicateLevel(u8),
}

/// Everything a rule may look at when deciding whether it applies.
pub struct PermissionSubject<'a> {
    /// The invoking user.
    pub user: UserId,
    /// The channel the event happened in.
    pub channel: Option<ChannelId>,
    /// The guild containing the channel.
    pub guild: Option<GuildId>,
    /// The guild owner, when known.
    pub guild_owner: Option<UserId>,
    /// Capability lookups for the channel.
    pub capabilities: &'a dyn CapabilityQuery,
}

impl PermissionSubject<'_> {
    fn holds(&self, required: Permissions) -> bool {
        self.channel.is_some()
            && self
                .capabilities
                .check(self.user, self.channel, required)
                .is_granted()
    }
}

type RuleTest = Box<dyn Fn(&PermissionSubject<'_>) -> bool + Send + Sync>;

/// A named level with the predicate that grants it.
pub struct PermissionRule {
    name: String,
    level: u8,
    test: RuleTest,
}

impl PermissionRule {
    /// Creates a rule. The predicate must not have side effects.
    pub fn new<F>(name: impl Into<String>, level: u8, test: F) -> Self
    where
        F: Fn(&PermissionSubject<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            level,
            test: Box::new(test),
        }
    }

    /// Display name of the level.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric level; higher is more privileged.
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Whether the rule applies to `subject`.
    pub fn matches(&self, subject: &PermissionSubject<'_>) -> bool {
        (self.test)(subject)
    }
}

impl fmt::Debug for PermissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionRule")
            .field("name", &self.name)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Immutable, ascending list of permission rules.
#[derive(Debug)]
pub struct PermissionTable {
    rules: Vec<PermissionRule>,
}

impl PermissionTable {
    /// Builds a table from arbitrary rules, sorting them by level.
    pub fn new(mut rules: Vec<PermissionRule>) -> Result<Self, PermissionTableError> {
        if rules.is_empty() {
            return Err(PermissionTableError::Empty);
        }
        rules.sort_by_key(PermissionRule::level);
        if let Some(pair) = rules.windows(2).find(|pair| pair[0].level == pair[1].level) {
            return Err(PermissionTableError::DuplicateLevel(pair[0].level));
        }
        Ok(Self { rules })
    }

    /// The default six level table driven by the `permissions` config section.
    pub fn from_config(config: &PermissionsConfig) -> Self {
        let developers = config.developers.clone();
        let owner = config.owner_id;

        Self {
            rules: vec![
                PermissionRule::new("User", levels::USER, |_| true),
                PermissionRule::new("Moderator", levels::MODERATOR, |subject| {
                    subject.holds(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS)
                }),
                PermissionRule::new("Administrator", levels::ADMINISTRATOR, |subject| {
                    subject.holds(Permissions::ADMINISTRATOR)
                }),
                PermissionRule::new("Server Owner", levels::SERVER_OWNER, |subject| {
                    subject.guild.is_some() && subject.guild_owner == Some(subject.user)
                }),
                PermissionRule::new("Developer", levels::DEVELOPER, move |subject| {
                    developers.contains(&subject.user)
                }),
                PermissionRule::new("Bot Owner", levels::BOT_OWNER, move |subject| {
                    owner == Some(subject.user)
                }),
            ],
        }
    }

    /// Returns the level of the highest rule whose test passes.
    pub fn resolve_level(&self, subject: &PermissionSubject<'_>) -> u8 {
        let level = self
            .rules
            .iter()
            .rev()
            .find(|rule| rule.matches(subject))
            .map_or_else(|| self.lowest_level(), PermissionRule::level);
        debug!(user = %subject.user, level, "Resolved permission level");
        level
    }

    /// The least privileged level.
    pub fn lowest_level(&self) -> u8 {
        self.rules.first().map_or(0, PermissionRule::level)
    }

    /// Looks a level up by its display name, ignoring case.
    pub fn level_for_name(&self, name: &str) -> Option<u8> {
        self.rules
            .iter()
            .find(|rule| rule.name.eq_ignore_ascii_case(name.trim()))
            .map(PermissionRule::level)
    }

    /// Display name for `level`.
    pub fn name_for_level(&self, level: u8) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.level == level)
            .map(PermissionRule::name)
    }

    /// The rules, lowest level first.
    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }
}
