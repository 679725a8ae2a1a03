//! Chat operations a reaction menu needs from the platform.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use twilight_model::channel::message::embed::Embed;

use super::matcher::ReactionMatcher;
use super::waiters::PendingReaction;

/// Failure of a single transport call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The message or reaction no longer exists.
    #[error("target no longer exists")]
    NotFound,
    /// The bot lacks the permission for this call.
    #[error("missing permission")]
    Forbidden,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// A message the bot sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Platform capability consumed by [`MenuSession`](super::MenuSession).
#[async_trait]
pub trait MenuTransport: Send + Sync {
    /// The bot's own user id.
    fn current_user_id(&self) -> u64;

    async fn send_message(&self, channel_id: u64, embed: &Embed) -> TransportResult<MessageHandle>;

    async fn edit_message(&self, handle: MessageHandle, embed: &Embed) -> TransportResult<()>;

    async fn delete_message(&self, handle: MessageHandle) -> TransportResult<()>;

    async fn add_reaction(&self, handle: MessageHandle, symbol: &str) -> TransportResult<()>;

    /// Remove `user_id`'s `symbol` reaction. Pass the bot's id to remove its own.
    async fn remove_reaction(
        &self,
        handle: MessageHandle,
        symbol: &str,
        user_id: u64,
    ) -> TransportResult<()>;

    /// Clear every reaction on the message. May fail with `Forbidden`.
    async fn remove_all_reactions(&self, handle: MessageHandle) -> TransportResult<()>;

    /// Register `matcher` and return the armed wait.
    fn wait_for_reaction(&self, matcher: Arc<ReactionMatcher>) -> PendingReaction;
}
