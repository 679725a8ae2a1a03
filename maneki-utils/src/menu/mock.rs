//! In-memory transport for driving sessions in tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use twilight_model::channel::message::embed::Embed;

use super::matcher::{ReactionEvent, ReactionMatcher};
use super::transport::{MenuTransport, MessageHandle, TransportError, TransportResult};
use super::waiters::{PendingReaction, ReactionWaiters};

pub const BOT: u64 = 1;
pub const AUTHOR: u64 = 2;
pub const CHANNEL: u64 = 10;
const MESSAGE: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Send { channel_id: u64 },
    Edit,
    Delete,
    Arm,
    AddReaction(String),
    RemoveReaction { symbol: String, user_id: u64 },
    RemoveAll,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    embeds: Vec<Embed>,
    deleted: bool,
    forbid_remove_all: bool,
    lose_on_add_reaction: bool,
    lose_on_edit: bool,
}

pub struct MockTransport {
    waiters: Arc<ReactionWaiters>,
    state: Mutex<State>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            waiters: Arc::new(ReactionWaiters::new()),
            state: Mutex::default(),
        }
    }

    pub fn waiters(&self) -> &Arc<ReactionWaiters> {
        &self.waiters
    }

    pub fn message_id(&self) -> u64 {
        MESSAGE
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn last_footer(&self) -> Option<String> {
        self.state()
            .embeds
            .last()
            .and_then(|embed| embed.footer.as_ref())
            .map(|footer| footer.text.clone())
    }

    pub fn pending_count(&self) -> usize {
        self.waiters.pending_count()
    }

    /// Simulate a user reacting; returns how many waiters resolved.
    pub fn react(&self, event: &ReactionEvent) -> usize {
        self.waiters.dispatch(event)
    }

    /// Every later call on the message reports `NotFound`.
    pub fn delete_externally(&self) {
        self.state().deleted = true;
    }

    pub fn forbid_remove_all(&self) {
        self.state().forbid_remove_all = true;
    }

    /// The message disappears as soon as the first control is attached.
    pub fn lose_message_on_add_reaction(&self) {
        self.state().lose_on_add_reaction = true;
    }

    /// The message disappears as soon as the menu edits it.
    pub fn lose_message_on_edit(&self) {
        self.state().lose_on_edit = true;
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call) -> TransportResult<()> {
        let mut state = self.state();
        state.calls.push(call);
        if state.deleted {
            Err(TransportError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MenuTransport for MockTransport {
    fn current_user_id(&self) -> u64 {
        BOT
    }

    async fn send_message(&self, channel_id: u64, embed: &Embed) -> TransportResult<MessageHandle> {
        self.record(Call::Send { channel_id })?;
        self.state().embeds.push(embed.clone());
        Ok(MessageHandle {
            channel_id,
            message_id: MESSAGE,
        })
    }

    async fn edit_message(&self, _handle: MessageHandle, embed: &Embed) -> TransportResult<()> {
        if self.state().lose_on_edit {
            self.delete_externally();
        }
        self.record(Call::Edit)?;
        self.state().embeds.push(embed.clone());
        Ok(())
    }

    async fn delete_message(&self, _handle: MessageHandle) -> TransportResult<()> {
        self.record(Call::Delete)?;
        self.state().deleted = true;
        Ok(())
    }

    async fn add_reaction(&self, _handle: MessageHandle, symbol: &str) -> TransportResult<()> {
        if self.state().lose_on_add_reaction {
            self.delete_externally();
        }
        self.record(Call::AddReaction(symbol.to_owned()))
    }

    async fn remove_reaction(
        &self,
        _handle: MessageHandle,
        symbol: &str,
        user_id: u64,
    ) -> TransportResult<()> {
        self.record(Call::RemoveReaction {
            symbol: symbol.to_owned(),
            user_id,
        })
    }

    async fn remove_all_reactions(&self, _handle: MessageHandle) -> TransportResult<()> {
        self.record(Call::RemoveAll)?;
        if self.state().forbid_remove_all {
            return Err(TransportError::Forbidden);
        }
        Ok(())
    }

    fn wait_for_reaction(&self, matcher: Arc<ReactionMatcher>) -> PendingReaction {
        self.state().calls.push(Call::Arm);
        self.waiters.wait_for(matcher)
    }
}

/// Yield until the session has a live waiter registered.
pub async fn wait_until_armed(transport: &MockTransport) {
    for _ in 0..10_000 {
        if transport.pending_count() > 0 {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("menu never armed a reaction waiter");
}

/// Let spawned attach tasks run to completion.
pub async fn settle() {
    for _ in 0..100 {
        tokio::task::yield_now().await;
    }
}
