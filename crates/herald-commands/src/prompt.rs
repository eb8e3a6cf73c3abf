//! Short-lived confirmation prompts answered through message components.

use dashmap::DashMap;
use herald_common::{ChannelId, UserId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

type PromptKey = (UserId, ChannelId);

struct Waiter {
    token: u64,
    sender: oneshot::Sender<String>,
}

/// Routes component answers to the handler awaiting them.
#[derive(Default)]
pub struct PromptCollector {
    pending: Arc<DashMap<PromptKey, Waiter>>,
    next_token: AtomicU64,
}

impl PromptCollector {
    /// A collector with no open prompts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a prompt answered by `owner` in `channel`, replacing any prompt already open there.
    pub fn open(&self, owner: UserId, channel: ChannelId) -> PendingPrompt {
        let (sender, receiver) = oneshot::channel();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.pending.insert((owner, channel), Waiter { token, sender });
        PendingPrompt {
            key: (owner, channel),
            token,
            receiver,
            pending: Arc::clone(&self.pending),
        }
    }

    /// Delivers an answer; returns whether a prompt was waiting for it.
    pub fn answer(&self, owner: UserId, channel: ChannelId, value: impl Into<String>) -> bool {
        match self.pending.remove(&(owner, channel)) {
            Some((_, waiter)) => waiter.sender.send(value.into()).is_ok(),
            None => false,
        }
    }

    /// Number of prompts still waiting.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for PromptCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptCollector")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

/// A prompt awaiting its answer.
pub struct PendingPrompt {
    key: PromptKey,
    token: u64,
    receiver: oneshot::Receiver<String>,
    pending: Arc<DashMap<PromptKey, Waiter>>,
}

impl PendingPrompt {
    /// Waits for the answer; `None` once `timeout` elapses or the prompt was replaced.
    ///
    /// After a timeout the prompt is closed and later answers are ignored.
    pub async fn wait(self, timeout: Duration) -> Option<String> {
        let Self {
            key,
            token,
            receiver,
            pending,
        } = self;

        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(answer)) => Some(answer),
            Ok(Err(_)) => None,
            Err(_) => {
                pending.remove_if(&key, |_, waiter| waiter.token == token);
                debug!(user = %key.0, channel = %key.1, "Prompt expired");
                None
            }
        }
    }
}
