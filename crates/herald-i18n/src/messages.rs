//! Message lookup with argument interpolation.

use crate::loader::{Bundle, FluentLoader};
use fluent_bundle::FluentArgs;
use herald_common::Result;
use std::fmt;
use tracing::warn;

/// Message identifiers used by the dispatcher and the built-in commands.
pub mod keys {
    #![allow(missing_docs)]

    pub const COMMAND_UNAVAILABLE: &str = "command-unavailable";
    pub const COMMAND_DISABLED: &str = "command-disabled";
    pub const INSUFFICIENT_PERMISSION: &str = "insufficient-permission";
    pub const MISSING_CLIENT_CAPABILITIES: &str = "missing-client-capabilities";
    pub const MISSING_CALLER_CAPABILITIES: &str = "missing-caller-capabilities";
    pub const NSFW_MISMATCH: &str = "nsfw-mismatch";
    pub const THROTTLED: &str = "throttled";
    pub const DIRECT_MESSAGES_UNSUPPORTED: &str = "direct-messages-unsupported";
    pub const COMPONENT_NOT_YOURS: &str = "component-not-yours";

    pub const PING: &str = "ping";
    pub const STATS: &str = "stats";
    pub const LATENCY_UNKNOWN: &str = "latency-unknown";
    pub const MEMORY_UNAVAILABLE: &str = "memory-unavailable";
    pub const PERMLEVEL: &str = "permlevel";
    pub const RELOAD_NOT_FOUND: &str = "reload-not-found";
    pub const RELOAD_FAILED: &str = "reload-failed";
    pub const RELOAD_SUCCESS: &str = "reload-success";
    pub const DEPLOY_CONFIRM: &str = "deploy-confirm";
    pub const DEPLOY_SUCCESS: &str = "deploy-success";
    pub const DEPLOY_FAILED: &str = "deploy-failed";
    pub const DEPLOY_CANCELLED: &str = "deploy-cancelled";
    pub const PROMPT_EXPIRED: &str = "prompt-expired";
    pub const PROMPT_ANSWERED: &str = "prompt-answered";
    pub const LINK_MISSING: &str = "link-missing";
}

/// Localized message catalogue for a single locale.
pub struct Messages {
    bundle: Bundle,
    locale: String,
}

impl Messages {
    /// Loads the catalogue for `locale`, falling back to the default locale.
    pub fn new(locale: &str) -> Result<Self> {
        let bundle = FluentLoader::load_with_fallback(locale)?;
        let locale = bundle
            .locales
            .first()
            .map_or_else(|| locale.to_string(), ToString::to_string);
        Ok(Self { bundle, locale })
    }

    /// Wraps an already built bundle.
    pub fn from_bundle(locale: impl Into<String>, bundle: Bundle) -> Self {
        Self {
            bundle,
            locale: locale.into(),
        }
    }

    /// Locale the catalogue resolved to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Whether a message with a value exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.bundle
            .get_message(key)
            .is_some_and(|message| message.value().is_some())
    }

    /// Gets a localized message.
    pub fn get(&self, key: &str) -> String {
        self.get_with_args(key, &[])
    }

    /// Gets a localized message with arguments.
    ///
    /// Unknown keys resolve to the key itself so a missing translation never
    /// swallows a reply.
    pub fn get_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let Some(pattern) = self.bundle.get_message(key).and_then(|m| m.value()) else {
            warn!(key, locale = %self.locale, "Missing message");
            return key.to_string();
        };

        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, (*value).to_string());
        }

        let mut errors = Vec::new();
        let formatted = self
            .bundle
            .format_pattern(pattern, Some(&fluent_args), &mut errors);
        if !errors.is_empty() {
            warn!(key, ?errors, "Message formatted with errors");
        }
        formatted.into_owned()
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_arguments() {
        let messages = Messages::new("en-US").unwrap();
        let text = messages.get_with_args(
            keys::THROTTLED,
            &[("user", "<@1>"), ("command", "ping"), ("seconds", "1.50")],
        );
        assert_eq!(text, "❌ <@1>, you can use **`/ping`** again in 1.50 seconds");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let messages = Messages::new("en-US").unwrap();
        assert!(!messages.has("does-not-exist"));
        assert_eq!(messages.get("does-not-exist"), "does-not-exist");
    }
}
