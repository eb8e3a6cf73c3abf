//! Common type definitions and newtype wrappers for domain modeling.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        // Snowflakes are usually quoted in config files, so accept both forms.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(SnowflakeVisitor).map(Self)
            }
        }
    };
}

struct SnowflakeVisitor;

impl<'de> de::Visitor<'de> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as an unsigned integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<u64, E> {
        u64::try_from(value).map_err(|_| E::custom("snowflake cannot be negative"))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<u64, E> {
        value
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid snowflake: {value:?}")))
    }
}

snowflake!(
    /// A Discord user ID.
    UserId
);

snowflake!(
    /// A Discord channel ID.
    ChannelId
);

snowflake!(
    /// A Discord guild (server) ID.
    GuildId
);

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, HeraldError>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum HeraldError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discord API error.
    #[error("Discord API error: {0}")]
    Discord(String),

    /// Command declaration or registry error.
    #[error("Command error: {0}")]
    Command(String),

    /// Localization error.
    #[error("Localization error: {0}")]
    Localization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
