//! Whether an invocation may run a descriptor at all.

use crate::capability::{describe_capabilities, CapabilityCheck, Permissions};
use crate::context::InvocationContext;
use crate::descriptor::CommandDescriptor;
use herald_common::UserId;
use herald_i18n::{keys, Messages};

/// Why an invocation was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The entry is disabled.
    Disabled,
    /// The caller's level is below the required one.
    InsufficientPermission {
        /// Level the entry requires.
        required: u8,
        /// Level of the caller.
        actual: u8,
    },
    /// The bot lacks these capabilities in the channel.
    MissingClientCapabilities(Permissions),
    /// The caller lacks these capabilities in the channel.
    MissingCallerCapabilities(Permissions),
    /// The entry is age restricted and the channel is not.
    NsfwMismatch,
}

impl Denial {
    /// Message key of the user-facing explanation.
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Disabled => keys::COMMAND_DISABLED,
            Self::InsufficientPermission { .. } => keys::INSUFFICIENT_PERMISSION,
            Self::MissingClientCapabilities(_) => keys::MISSING_CLIENT_CAPABILITIES,
            Self::MissingCallerCapabilities(_) => keys::MISSING_CALLER_CAPABILITIES,
            Self::NsfwMismatch => keys::NSFW_MISMATCH,
        }
    }

    /// Renders the explanation for the caller of `ctx`.
    pub fn render(&self, messages: &Messages, ctx: &InvocationContext) -> String {
        let user = ctx.mention();
        let channel = ctx.channel_mention();
        let capabilities = match self {
            Self::MissingClientCapabilities(missing) | Self::MissingCallerCapabilities(missing) => {
                describe_capabilities(*missing)
            }
            _ => String::new(),
        };
        messages.get_with_args(
            self.message_key(),
            &[
                ("user", user.as_str()),
                ("channel", channel.as_str()),
                ("capabilities", capabilities.as_str()),
            ],
        )
    }
}

/// Result of the eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Every check passed.
    Allowed,
    /// The first failing check.
    Denied(Denial),
}

/// Runs the ordered eligibility checks; the first failing one is reported.
///
/// `client` is the bot's own user, whose capabilities are checked before the caller's.
pub fn check_eligibility(
    descriptor: &CommandDescriptor,
    ctx: &InvocationContext,
    client: UserId,
) -> Eligibility {
    let config = &descriptor.config;

    if !config.enabled {
        return Eligibility::Denied(Denial::Disabled);
    }

    if ctx.permission_level < config.permission_level {
        return Eligibility::Denied(Denial::InsufficientPermission {
            required: config.permission_level,
            actual: ctx.permission_level,
        });
    }

    if !config.client_capabilities.is_empty() {
        if let CapabilityCheck::Missing(missing) =
            ctx.capabilities
                .check(client, Some(ctx.channel), config.client_capabilities)
        {
            return Eligibility::Denied(Denial::MissingClientCapabilities(missing));
        }
    }

    if !config.caller_capabilities.is_empty() {
        if let CapabilityCheck::Missing(missing) =
            ctx.capabilities
                .check(ctx.user, Some(ctx.channel), config.caller_capabilities)
        {
            return Eligibility::Denied(Denial::MissingCallerCapabilities(missing));
        }
    }

    if config.nsfw && !ctx.channel_nsfw {
        return Eligibility::Denied(Denial::NsfwMismatch);
    }

    Eligibility::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::MockCapabilityQuery;
    use crate::test_support::{context, descriptor, CLIENT};
    use std::sync::Arc;

    fn grant_all() -> Arc<MockCapabilityQuery> {
        let mut caps = MockCapabilityQuery::new();
        caps.expect_check().returning(|_, _, _| CapabilityCheck::Granted);
        Arc::new(caps)
    }

    #[test]
    fn test_allowed_by_default() {
        let ctx = context(UserId(1));
        assert_eq!(
            check_eligibility(&descriptor("ping"), &ctx, CLIENT),
            Eligibility::Allowed
        );
    }

    #[test]
    fn test_disabled_reported_first() {
        let mut d = descriptor("ping");
        d.config.enabled = false;
        d.config.permission_level = 5;
        d.config.client_capabilities = Permissions::ADMINISTRATOR;
        d.config.nsfw = true;

        let mut caps = MockCapabilityQuery::new();
        caps.expect_check().never();
        let mut ctx = context(UserId(1));
        ctx.capabilities = Arc::new(caps);

        assert_eq!(
            check_eligibility(&d, &ctx, CLIENT),
            Eligibility::Denied(Denial::Disabled)
        );
    }

    #[test]
    fn test_permission_before_capabilities() {
        let mut d = descriptor("ban");
        d.config.permission_level = 1;
        d.config.caller_capabilities = Permissions::BAN_MEMBERS;

        let ctx = context(UserId(1));
        assert_eq!(
            check_eligibility(&d, &ctx, CLIENT),
            Eligibility::Denied(Denial::InsufficientPermission {
                required: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_client_capabilities_checked_before_caller() {
        let mut d = descriptor("embed");
        d.config.client_capabilities = Permissions::EMBED_LINKS;
        d.config.caller_capabilities = Permissions::MANAGE_MESSAGES;

        let mut caps = MockCapabilityQuery::new();
        caps.expect_check()
            .withf(|entity, _, _| *entity == CLIENT)
            .returning(|_, _, required| CapabilityCheck::Missing(required));
        let mut ctx = context(UserId(1));
        ctx.capabilities = Arc::new(caps);

        assert_eq!(
            check_eligibility(&d, &ctx, CLIENT),
            Eligibility::Denied(Denial::MissingClientCapabilities(Permissions::EMBED_LINKS))
        );
    }

    #[test]
    fn test_caller_capabilities_and_nsfw() {
        let mut d = descriptor("purge");
        d.config.caller_capabilities = Permissions::MANAGE_MESSAGES;

        let mut caps = MockCapabilityQuery::new();
        caps.expect_check()
            .returning(|entity, _, required| {
                if entity == CLIENT {
                    CapabilityCheck::Granted
                } else {
                    CapabilityCheck::Missing(required)
                }
            });
        let mut ctx = context(UserId(1));
        ctx.capabilities = Arc::new(caps);
        assert_eq!(
            check_eligibility(&d, &ctx, CLIENT),
            Eligibility::Denied(Denial::MissingCallerCapabilities(Permissions::MANAGE_MESSAGES))
        );

        let mut nsfw = descriptor("lewd");
        nsfw.config.nsfw = true;
        ctx.capabilities = grant_all();
        assert_eq!(
            check_eligibility(&nsfw, &ctx, CLIENT),
            Eligibility::Denied(Denial::NsfwMismatch)
        );
        ctx.channel_nsfw = true;
        assert_eq!(check_eligibility(&nsfw, &ctx, CLIENT), Eligibility::Allowed);
    }

    #[test]
    fn test_render_lists_capabilities() {
        let messages = Messages::new("en-US").unwrap();
        let ctx = context(UserId(1));
        let text = Denial::MissingCallerCapabilities(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS)
            .render(&messages, &ctx);
        assert!(text.contains("<@1>"));
        assert!(text.contains("Kick Members, Ban Members"));
    }
}
