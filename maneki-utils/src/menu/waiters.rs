//! Registry of open reaction waits, fed by the gateway loop.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
    task::{Context, Poll},
};

use tokio::sync::oneshot;
use tracing::trace;

use super::matcher::{ReactionEvent, ReactionMatcher};

/// How a pending wait resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReactionSignal {
    /// An event passed the matcher.
    Reacted(ReactionEvent),
    /// The message the matcher is scoped to was deleted.
    MessageDeleted,
    /// The hub went away; no event will ever arrive.
    Disconnected,
}

struct Waiter {
    matcher: Arc<ReactionMatcher>,
    sender: oneshot::Sender<ReactionSignal>,
}

/// Open reaction waits keyed by registration id.
///
/// The gateway loop calls [`ReactionWaiters::dispatch`] for every reaction it
/// receives and [`ReactionWaiters::notify_deleted`] for every deleted message.
#[derive(Default)]
pub struct ReactionWaiters {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, Waiter>>,
}

impl ReactionWaiters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `matcher`. The wait is armed before this returns, so events
    /// dispatched afterwards are never missed.
    pub fn wait_for(self: &Arc<Self>, matcher: Arc<ReactionMatcher>) -> PendingReaction {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();

        self.lock().insert(id, Waiter { matcher, sender });
        trace!(waiter_id = id, "reaction waiter armed");

        PendingReaction {
            id,
            receiver,
            waiters: Arc::downgrade(self),
        }
    }

    /// Resolve every waiter whose matcher accepts `event`. Returns how many resolved.
    pub fn dispatch(&self, event: &ReactionEvent) -> usize {
        let mut pending = self.lock();
        pending.retain(|_, waiter| !waiter.sender.is_closed());

        let matched: Vec<u64> = pending
            .iter()
            .filter(|(_, waiter)| waiter.matcher.test(event))
            .map(|(id, _)| *id)
            .collect();

        resolve(&mut pending, &matched, || ReactionSignal::Reacted(event.clone()))
    }

    /// Resolve every waiter scoped to `message_id` with [`ReactionSignal::MessageDeleted`].
    pub fn notify_deleted(&self, message_id: u64) -> usize {
        let mut pending = self.lock();

        let matched: Vec<u64> = pending
            .iter()
            .filter(|(_, waiter)| waiter.matcher.scope().message_id == Some(message_id))
            .map(|(id, _)| *id)
            .collect();

        resolve(&mut pending, &matched, || ReactionSignal::MessageDeleted)
    }

    /// Number of waits currently registered.
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn remove(&self, id: u64) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Waiter>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve(
    pending: &mut HashMap<u64, Waiter>,
    ids: &[u64],
    signal: impl Fn() -> ReactionSignal,
) -> usize {
    let mut resolved = 0;
    for id in ids {
        if let Some(waiter) = pending.remove(id)
            && waiter.sender.send(signal()).is_ok()
        {
            resolved += 1;
        }
    }
    resolved
}

/// A registered wait. Dropping it deregisters the waiter.
pub struct PendingReaction {
    id: u64,
    receiver: oneshot::Receiver<ReactionSignal>,
    waiters: Weak<ReactionWaiters>,
}

impl PendingReaction {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Future for PendingReaction {
    type Output = ReactionSignal;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|signal| signal.unwrap_or(ReactionSignal::Disconnected))
    }
}

impl Drop for PendingReaction {
    fn drop(&mut self) {
        if let Some(waiters) = self.waiters.upgrade() {
            waiters.remove(self.id);
        }
    }
}
