use super::confirm::{CONFIRM_ACCEPT, CONFIRM_DECLINE};
use super::say;
use crate::context::{Button, ButtonStyle, InvocationContext, Reply};
use crate::framework::{Data, Error};
use crate::registration::sync_application_commands;
use herald_i18n::keys;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Asks for confirmation, then pushes application command data.
pub async fn deploy(data: Arc<Data>, ctx: InvocationContext) -> Result<(), Error> {
    let config = data.config.get();
    let timeout = config.dispatch.prompt_timeout_seconds;
    let seconds = timeout.to_string();

    let prompt = data.prompts.open(ctx.user, ctx.channel);
    let question = say(&data, &ctx, keys::DEPLOY_CONFIRM, &[("seconds", seconds.as_str())]);
    ctx.reply(
        Reply::ephemeral(question)
            .with_button(Button::new(CONFIRM_ACCEPT, "Deploy", ButtonStyle::Success))
            .with_button(Button::new(CONFIRM_DECLINE, "Cancel", ButtonStyle::Secondary)),
    )
    .await?;

    let content = match prompt.wait(Duration::from_secs(timeout)).await.as_deref() {
        Some(CONFIRM_ACCEPT) => {
            info!(user = %ctx.user, "Deploying application command data");
            match sync_application_commands(
                &data.registry,
                data.registrar.as_ref(),
                config.discord.test_guild_id,
                config.commands.debug_registration_data,
            )
            .await
            {
                Ok(report) => {
                    let global = report.global.to_string();
                    let guild = report.guild.to_string();
                    say(
                        &data,
                        &ctx,
                        keys::DEPLOY_SUCCESS,
                        &[("global", global.as_str()), ("guild", guild.as_str())],
                    )
                }
                Err(e) => {
                    error!("Deployment failed: {e}");
                    say(&data, &ctx, keys::DEPLOY_FAILED, &[])
                }
            }
        }
        Some(_) => say(&data, &ctx, keys::DEPLOY_CANCELLED, &[]),
        None => say(&data, &ctx, keys::PROMPT_EXPIRED, &[]),
    };
    ctx.edit_reply(Reply::ephemeral(content)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InvocationKind;
    use crate::registration::MockRemoteRegistrar;
    use crate::test_support::{data_with, data_with_registrar, descriptor, incoming, CHANNEL, OWNER};

    async fn answer_when_open(data: Arc<Data>, value: &'static str) {
        while data.prompts.pending_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(data.prompts.answer(OWNER, CHANNEL, value));
    }

    fn context() -> (InvocationContext, Arc<crate::test_support::RecordingTransport>) {
        let (event, transport) = incoming(InvocationKind::ChatInput, "deploy", OWNER);
        (
            InvocationContext::from_event(event, uuid::Uuid::new_v4(), 5),
            transport,
        )
    }

    #[tokio::test]
    async fn test_accept_deploys() {
        let mut registrar = MockRemoteRegistrar::new();
        registrar
            .expect_set_guild_commands()
            .times(1)
            .returning(|_, commands| Ok(commands.len()));
        registrar
            .expect_set_global_commands()
            .times(1)
            .returning(|commands| Ok(commands.len()));
        let data = data_with_registrar(vec![descriptor("ping")], Arc::new(registrar));

        let (ctx, transport) = context();
        let answer = tokio::spawn(answer_when_open(data.clone(), CONFIRM_ACCEPT));
        deploy(data, ctx).await.unwrap();
        answer.await.unwrap();

        let question = &transport.replies()[0];
        assert_eq!(question.buttons.len(), 2);
        assert!(transport.edits()[0].content.contains("(1 global, 0 test server)"));
    }

    #[tokio::test]
    async fn test_decline_cancels() {
        let mut registrar = MockRemoteRegistrar::new();
        registrar.expect_set_global_commands().never();
        registrar.expect_set_guild_commands().never();
        let data = data_with_registrar(Vec::new(), Arc::new(registrar));

        let (ctx, transport) = context();
        let answer = tokio::spawn(answer_when_open(data.clone(), CONFIRM_DECLINE));
        deploy(data, ctx).await.unwrap();
        answer.await.unwrap();
        assert!(transport.edits()[0].content.contains("deployment cancelled"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_prompt_expires() {
        let data = data_with(Vec::new());
        let (ctx, transport) = context();
        deploy(data.clone(), ctx).await.unwrap();
        assert!(transport.edits()[0].content.contains("this prompt has expired"));
        assert_eq!(data.prompts.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_sync_is_reported() {
        let mut registrar = MockRemoteRegistrar::new();
        registrar
            .expect_set_guild_commands()
            .returning(|_, _| Err("unauthorized".into()));
        let data = data_with_registrar(Vec::new(), Arc::new(registrar));

        let (ctx, transport) = context();
        let answer = tokio::spawn(answer_when_open(data.clone(), CONFIRM_ACCEPT));
        deploy(data, ctx).await.unwrap();
        answer.await.unwrap();
        assert!(transport.edits()[0].content.contains("refreshing application command data failed"));
    }
}
