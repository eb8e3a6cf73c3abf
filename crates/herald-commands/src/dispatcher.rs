//! Routes incoming events through resolution, eligibility and throttling to their handler.

use crate::context::{IncomingEvent, InvocationContext, InvocationKind, Reply};
use crate::descriptor::CommandDescriptor;
use crate::eligibility::{check_eligibility, Denial, Eligibility};
use crate::framework::Data;
use crate::permissions::PermissionSubject;
use crate::throttle::ThrottleVerdict;
use herald_i18n::keys;
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

/// Why an event did not reach its handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Direct messages are not accepted.
    DirectMessage,
    /// No descriptor matches the identifier.
    UnknownCommand,
    /// The interaction can no longer be answered.
    NotReplyable,
    /// The component belongs to another user's response.
    ForeignComponent,
    /// An eligibility check failed.
    Ineligible(Denial),
    /// The cooldown quota is used up.
    Throttled {
        /// Seconds until the next usage is allowed.
        retry_after_seconds: f64,
    },
}

/// What became of a dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Completed,
    /// The event was stopped before the handler.
    Rejected(Rejection),
    /// The handler returned an error or panicked.
    HandlerFailed(String),
}

/// Orchestrates a single event from arrival to handler completion.
#[derive(Clone)]
pub struct Dispatcher {
    data: Arc<Data>,
}

impl Dispatcher {
    /// A dispatcher over the shared application state.
    pub fn new(data: Arc<Data>) -> Self {
        Self { data }
    }

    /// Shared application state.
    pub fn data(&self) -> &Arc<Data> {
        &self.data
    }

    /// Dispatches one event. Never panics and never propagates handler failures.
    pub async fn dispatch(&self, event: IncomingEvent) -> DispatchOutcome {
        let id = Uuid::new_v4();
        let span = info_span!(
            "dispatch",
            invocation = %id,
            kind = ?event.kind,
            identifier = %event.identifier,
            user = %event.user,
        );
        self.run(event, id).instrument(span).await
    }

    async fn run(&self, event: IncomingEvent, id: Uuid) -> DispatchOutcome {
        let config = self.data.config.get();
        let messages = &self.data.messages;

        if event.guild.is_none() && !config.dispatch.allow_direct_messages {
            if event.kind != InvocationKind::Autocomplete && event.transport.is_replyable() {
                let content = messages.get_with_args(
                    keys::DIRECT_MESSAGES_UNSUPPORTED,
                    &[("user", format!("<@{}>", event.user).as_str())],
                );
                send(&event.transport.reply(Reply::ephemeral(content)).await);
            }
            return DispatchOutcome::Rejected(Rejection::DirectMessage);
        }

        let level = self.data.permissions.resolve_level(&PermissionSubject {
            user: event.user,
            channel: Some(event.channel),
            guild: event.guild,
            guild_owner: event.guild_owner,
            capabilities: event.capabilities.as_ref(),
        });
        let ctx = InvocationContext::from_event(event, id, level);

        if ctx.kind == InvocationKind::Autocomplete {
            return match self.data.registry.resolve(ctx.kind, &ctx.identifier) {
                Some(descriptor) => self.execute(descriptor, ctx).await,
                None => {
                    debug!("No autocomplete provider registered");
                    DispatchOutcome::Rejected(Rejection::UnknownCommand)
                }
            };
        }

        let Some(descriptor) = self.data.registry.resolve(ctx.kind, &ctx.identifier) else {
            error!(
                "Missing interaction listener for \"{}\" ({:?}), the remote command data may be out of date",
                ctx.identifier, ctx.kind
            );
            if ctx.transport.is_replyable() {
                let content =
                    messages.get_with_args(keys::COMMAND_UNAVAILABLE, &[("user", ctx.mention().as_str())]);
                send(&ctx.reply(Reply::ephemeral(content)).await);
            }
            return DispatchOutcome::Rejected(Rejection::UnknownCommand);
        };

        if !ctx.transport.is_replyable() {
            debug!("Interaction can no longer be replied to");
            return DispatchOutcome::Rejected(Rejection::NotReplyable);
        }

        if ctx.kind.is_component() && ctx.component_owner.is_some_and(|owner| owner != ctx.user) {
            let content =
                messages.get_with_args(keys::COMPONENT_NOT_YOURS, &[("user", ctx.mention().as_str())]);
            send(&ctx.reply(Reply::ephemeral(content)).await);
            return DispatchOutcome::Rejected(Rejection::ForeignComponent);
        }

        if let Eligibility::Denied(denial) =
            check_eligibility(&descriptor, &ctx, config.discord.client_id)
        {
            debug!(?denial, "Invocation denied");
            send(&ctx.reply(Reply::ephemeral(denial.render(messages, &ctx))).await);
            return DispatchOutcome::Rejected(Rejection::Ineligible(denial));
        }

        if ctx.permission_level < config.dispatch.throttle_bypass_level {
            if let ThrottleVerdict::Denied {
                retry_after_seconds,
            } = self.data.throttle.check_and_record(&descriptor, &ctx)
            {
                if config.commands.debug_throttling {
                    debug!(retry_after_seconds, "Invocation throttled");
                }
                let content = messages.get_with_args(
                    keys::THROTTLED,
                    &[
                        ("user", ctx.mention().as_str()),
                        ("command", descriptor.identifier.as_str()),
                        ("seconds", format!("{retry_after_seconds:.2}").as_str()),
                    ],
                );
                send(&ctx.reply(Reply::ephemeral(content)).await);
                return DispatchOutcome::Rejected(Rejection::Throttled {
                    retry_after_seconds,
                });
            }
        }

        self.execute(descriptor, ctx).await
    }

    /// Runs the handler in its own task so errors and panics stay contained.
    async fn execute(
        &self,
        descriptor: Arc<CommandDescriptor>,
        ctx: InvocationContext,
    ) -> DispatchOutcome {
        let handler = Arc::clone(&descriptor.handler);
        let data = Arc::clone(&self.data);
        let task = tokio::spawn(
            async move { handler.run(data, ctx).await }.in_current_span(),
        );

        match task.await {
            Ok(Ok(())) => {
                debug!("Handler completed");
                DispatchOutcome::Completed
            }
            Ok(Err(e)) => {
                error!(
                    identifier = %descriptor.identifier,
                    origin = %descriptor.origin.display(),
                    "Handler failed: {e:?}"
                );
                DispatchOutcome::HandlerFailed(e.to_string())
            }
            Err(join) => {
                let detail = if join.is_panic() {
                    panic_message(join.into_panic())
                } else {
                    join.to_string()
                };
                error!(
                    identifier = %descriptor.identifier,
                    origin = %descriptor.origin.display(),
                    "Handler panicked: {detail}"
                );
                DispatchOutcome::HandlerFailed(detail)
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.data.registry)
            .finish_non_exhaustive()
    }
}

fn send(result: &Result<(), crate::framework::Error>) {
    if let Err(e) = result {
        warn!("Failed to reply to interaction: {e}");
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string())
}
