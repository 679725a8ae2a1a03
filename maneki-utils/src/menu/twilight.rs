//! [`MenuTransport`] backed by the Discord HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::{Client, error::ErrorType, request::channel::reaction::RequestReactionType};
use twilight_model::{
    channel::message::{EmojiReactionType, embed::Embed},
    gateway::payload::incoming::ReactionAdd,
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use super::matcher::{ReactionEvent, ReactionMatcher};
use super::transport::{MenuTransport, MessageHandle, TransportError, TransportResult};
use super::waiters::{PendingReaction, ReactionWaiters};

/// Shared transport for every menu opened by the bot.
#[derive(Clone)]
pub struct TwilightTransport {
    http: Arc<Client>,
    waiters: Arc<ReactionWaiters>,
    user_id: u64,
}

impl TwilightTransport {
    pub fn new(http: Arc<Client>, waiters: Arc<ReactionWaiters>, user_id: u64) -> Self {
        Self {
            http,
            waiters,
            user_id,
        }
    }
}

#[async_trait]
impl MenuTransport for TwilightTransport {
    fn current_user_id(&self) -> u64 {
        self.user_id
    }

    async fn send_message(&self, channel_id: u64, embed: &Embed) -> TransportResult<MessageHandle> {
        let channel_id =
            Id::<ChannelMarker>::new_checked(channel_id).ok_or(TransportError::NotFound)?;

        let message = self
            .http
            .create_message(channel_id)
            .embeds(std::slice::from_ref(embed))
            .await?
            .model()
            .await
            .map_err(|source| TransportError::Other(source.into()))?;

        Ok(MessageHandle {
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
        })
    }

    async fn edit_message(&self, handle: MessageHandle, embed: &Embed) -> TransportResult<()> {
        let (channel_id, message_id) = message_ids(handle)?;

        self.http
            .update_message(channel_id, message_id)
            .embeds(Some(std::slice::from_ref(embed)))
            .await?;

        Ok(())
    }

    async fn delete_message(&self, handle: MessageHandle) -> TransportResult<()> {
        let (channel_id, message_id) = message_ids(handle)?;

        self.http.delete_message(channel_id, message_id).await?;

        Ok(())
    }

    async fn add_reaction(&self, handle: MessageHandle, symbol: &str) -> TransportResult<()> {
        let (channel_id, message_id) = message_ids(handle)?;
        let emoji = RequestReactionType::Unicode { name: symbol };

        self.http
            .create_reaction(channel_id, message_id, &emoji)
            .await?;

        Ok(())
    }

    async fn remove_reaction(
        &self,
        handle: MessageHandle,
        symbol: &str,
        user_id: u64,
    ) -> TransportResult<()> {
        let (channel_id, message_id) = message_ids(handle)?;
        let emoji = RequestReactionType::Unicode { name: symbol };

        if user_id == self.user_id {
            self.http
                .delete_current_user_reaction(channel_id, message_id, &emoji)
                .await?;
        } else {
            let user_id = Id::new_checked(user_id).ok_or(TransportError::NotFound)?;
            self.http
                .delete_reaction(channel_id, message_id, &emoji, user_id)
                .await?;
        }

        Ok(())
    }

    async fn remove_all_reactions(&self, handle: MessageHandle) -> TransportResult<()> {
        let (channel_id, message_id) = message_ids(handle)?;

        self.http
            .delete_all_reactions(channel_id, message_id)
            .await?;

        Ok(())
    }

    fn wait_for_reaction(&self, matcher: Arc<ReactionMatcher>) -> PendingReaction {
        self.waiters.wait_for(matcher)
    }
}

/// Reduce a gateway reaction to the fields menus match on.
pub fn reaction_event(reaction: &ReactionAdd) -> ReactionEvent {
    let emoji = match &reaction.emoji {
        EmojiReactionType::Unicode { name } => name.clone(),
        EmojiReactionType::Custom { id, name, .. } => {
            name.clone().unwrap_or_else(|| id.get().to_string())
        }
    };

    ReactionEvent {
        channel_id: reaction.channel_id.get(),
        message_id: reaction.message_id.get(),
        user_id: reaction.user_id.get(),
        emoji,
    }
}

/// Map HTTP status codes onto the menu error taxonomy.
impl From<twilight_http::Error> for TransportError {
    fn from(source: twilight_http::Error) -> Self {
        if let ErrorType::Response { status, .. } = source.kind() {
            match status.get() {
                404 => return Self::NotFound,
                403 => return Self::Forbidden,
                _ => {}
            }
        }

        Self::Other(source.into())
    }
}

fn message_ids(
    handle: MessageHandle,
) -> TransportResult<(Id<ChannelMarker>, Id<MessageMarker>)> {
    let channel_id = Id::new_checked(handle.channel_id).ok_or(TransportError::NotFound)?;
    let message_id = Id::new_checked(handle.message_id).ok_or(TransportError::NotFound)?;
    Ok((channel_id, message_id))
}
