//! One open reaction menu and its render/wait/dispatch loop.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use twilight_model::channel::message::embed::Embed;

use crate::embed::menu_page_embed;

use super::controls::{Control, ControlSet, Direction, emojit};
use super::matcher::{ReactionEvent, ReactionMatcher, ReactionScope};
use super::paginate::{MAX_PAGE_SIZE, Pages, clamp_page, page_count, page_window, paginate};
use super::transport::{MenuTransport, MessageHandle, TransportError};
use super::waiters::{PendingReaction, ReactionSignal};

/// Default time a menu waits for a reaction before shedding its controls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidPageSize(usize),
}

/// Where the menu was opened and by whom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuInvocation {
    pub channel_id: u64,
    pub author_id: u64,
}

/// Snapshot handed to an item action when its control fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuSelection {
    pub label: String,
    /// Zero-based index into the full item list.
    pub index: usize,
    /// One-based page the item was picked from.
    pub page: usize,
    pub user_id: u64,
    pub message: MessageHandle,
}

/// What the menu does after an item action returns.
#[derive(Debug)]
pub enum MenuEffect {
    /// Re-render the current page.
    Refresh,
    /// Jump to a one-based page (clamped).
    GoTo(usize),
    /// Replace every item and return to page 1.
    Replace(Vec<MenuItem>),
    /// Delete the menu message and stop.
    Close,
}

/// Effect run when a menu item is selected.
#[async_trait]
pub trait MenuAction: Send + Sync {
    async fn run(&self, selection: MenuSelection) -> anyhow::Result<MenuEffect>;
}

#[async_trait]
impl<F, Fut> MenuAction for F
where
    F: Fn(MenuSelection) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<MenuEffect>> + Send + 'static,
{
    async fn run(&self, selection: MenuSelection) -> anyhow::Result<MenuEffect> {
        (self)(selection).await
    }
}

/// A labelled entry of a menu.
#[derive(Clone)]
pub struct MenuItem {
    label: String,
    action: Arc<dyn MenuAction>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: impl MenuAction + 'static) -> Self {
        Self {
            label: label.into(),
            action: Arc::new(action),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Loop position, traced on every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuPhase {
    Rendering,
    AwaitingInput,
    Dispatching,
    Closed,
    Expired,
    Cancelled,
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Closed by its author, or its message disappeared.
    Closed,
    /// No qualifying reaction arrived within the timeout.
    Expired,
    /// Stopped from outside, e.g. on shutdown.
    Cancelled,
}

impl From<MenuOutcome> for MenuPhase {
    fn from(outcome: MenuOutcome) -> Self {
        match outcome {
            MenuOutcome::Closed => Self::Closed,
            MenuOutcome::Expired => Self::Expired,
            MenuOutcome::Cancelled => Self::Cancelled,
        }
    }
}

enum Input {
    Reacted(ReactionEvent),
    TimedOut,
    Cancelled,
    MessageGone,
}

/// An emoji-driven paginated menu bound to a single message.
///
/// The session renders its current page, arms a reaction matcher scoped to
/// the message and the invoking author, attaches the controls, and waits.
/// Every matching reaction is removed again, its control runs, and the page
/// is re-rendered in place. The loop ends on close, timeout, cancellation, or
/// when the message disappears.
pub struct MenuSession<T: MenuTransport + ?Sized + 'static> {
    transport: Arc<T>,
    invocation: MenuInvocation,
    title: String,
    items: Vec<MenuItem>,
    page_size: usize,
    page: usize,
    timeout: Duration,
    cancel: CancellationToken,
    message_gone: CancellationToken,
    message: Option<MessageHandle>,
    attached: Vec<&'static str>,
    attach_task: Option<JoinHandle<()>>,
    phase: MenuPhase,
}

impl<T: MenuTransport + ?Sized + 'static> MenuSession<T> {
    pub fn new(
        transport: Arc<T>,
        invocation: MenuInvocation,
        title: impl Into<String>,
        items: Vec<MenuItem>,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self, MenuError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(MenuError::InvalidPageSize(page_size));
        }

        Ok(Self {
            transport,
            invocation,
            title: title.into(),
            items,
            page_size,
            page: 1,
            timeout,
            cancel: CancellationToken::new(),
            message_gone: CancellationToken::new(),
            message: None,
            attached: Vec::new(),
            attach_task: None,
            phase: MenuPhase::Rendering,
        })
    }

    /// Open on `page` instead of page 1 (clamped).
    pub fn with_start_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }

    /// Stop the session when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.items.len(), self.page_size)
    }

    pub fn pages(&self) -> Pages<'_, MenuItem> {
        paginate(&self.items, self.page_size)
    }

    /// Items shown on the current page.
    pub fn current_items(&self) -> &[MenuItem] {
        let (start, end) = page_window(self.items.len(), self.page_size, self.page);
        &self.items[start..end]
    }

    /// Navigation plus one control per item on the current page.
    pub fn controls(&self) -> ControlSet {
        ControlSet::for_page(self.current_items().len())
    }

    /// Message currently showing the menu.
    pub fn message(&self) -> Option<MessageHandle> {
        self.message
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.page_count());
    }

    /// Advance one page, wrapping from the last page to the first.
    pub fn next_page(&mut self) {
        self.page = if self.page >= self.page_count() {
            1
        } else {
            self.page + 1
        };
    }

    /// Go back one page, wrapping from the first page to the last.
    pub fn previous_page(&mut self) {
        self.page = if self.page <= 1 {
            self.page_count()
        } else {
            self.page - 1
        };
    }

    /// Replace every item and return to page 1.
    pub fn reset(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.page = 1;
    }

    /// Embed for the current page.
    pub fn render_embed(&self) -> anyhow::Result<Embed> {
        let lines: Vec<String> = self
            .current_items()
            .iter()
            .enumerate()
            .map(|(position, item)| match emojit(position) {
                Some(symbol) => format!("{symbol} {}", item.label),
                None => item.label.clone(),
            })
            .collect();

        menu_page_embed(&self.title, &lines, self.page, self.page_count())
    }

    /// Run the menu on its own task.
    pub fn spawn(self) -> JoinHandle<MenuOutcome> {
        tokio::spawn(self.run())
    }

    /// Drive the menu until it closes, expires, or is cancelled.
    pub async fn run(mut self) -> MenuOutcome {
        let outcome = self.drive().await;
        self.abort_attach();
        self.message = None;
        self.set_phase(outcome.into());
        debug!(?outcome, title = %self.title, "menu finished");
        outcome
    }

    async fn drive(&mut self) -> MenuOutcome {
        loop {
            self.set_phase(MenuPhase::Rendering);
            let Some(handle) = self.render().await else {
                return MenuOutcome::Closed;
            };

            let controls = self.controls();
            let symbols = controls.symbols();
            let scope = ReactionScope::new(self.transport.current_user_id())
                .message(handle.message_id)
                .user(self.invocation.author_id);
            let matcher = Arc::new(ReactionMatcher::with_emojis(scope, symbols.iter().copied()));

            // Armed before any control is attached so early reactions are caught.
            let pending = self.transport.wait_for_reaction(Arc::clone(&matcher));
            self.attach_controls(handle, symbols);

            self.set_phase(MenuPhase::AwaitingInput);
            let event = match self.await_input(pending).await {
                Input::Reacted(event) => event,
                Input::TimedOut => return self.teardown(handle, MenuOutcome::Expired).await,
                Input::Cancelled => return self.teardown(handle, MenuOutcome::Cancelled).await,
                Input::MessageGone => {
                    debug!(message_id = handle.message_id, "menu message was deleted");
                    return MenuOutcome::Closed;
                }
            };

            self.set_phase(MenuPhase::Dispatching);
            let Some(control) = matcher.last_match().and_then(|index| controls.get(index)) else {
                continue;
            };

            if let Some(outcome) = self.dispatch(handle, &event, control).await {
                return outcome;
            }
        }
    }

    /// Send or edit the menu message. `None` means the menu cannot continue.
    async fn render(&mut self) -> Option<MessageHandle> {
        let embed = match self.render_embed() {
            Ok(embed) => embed,
            Err(source) => {
                warn!(?source, title = %self.title, "failed to build menu page");
                if let Some(handle) = self.message {
                    let _ = self.teardown(handle, MenuOutcome::Closed).await;
                }
                return None;
            }
        };

        let Some(handle) = self.message else {
            return match self
                .transport
                .send_message(self.invocation.channel_id, &embed)
                .await
            {
                Ok(handle) => {
                    self.message = Some(handle);
                    Some(handle)
                }
                Err(source) => {
                    warn!(?source, channel_id = self.invocation.channel_id, "failed to send menu");
                    None
                }
            };
        };

        match self.transport.edit_message(handle, &embed).await {
            Ok(()) => Some(handle),
            Err(TransportError::NotFound) => {
                debug!(message_id = handle.message_id, "menu message vanished before edit");
                None
            }
            Err(source) => {
                warn!(?source, message_id = handle.message_id, "failed to edit menu");
                Some(handle)
            }
        }
    }

    /// Attach `symbols` in the background, dropping the previous page's extras.
    fn attach_controls(&mut self, handle: MessageHandle, symbols: Vec<&'static str>) {
        self.abort_attach();

        let stale: Vec<&'static str> = self
            .attached
            .iter()
            .filter(|symbol| !symbols.contains(symbol))
            .copied()
            .collect();
        self.attached.clone_from(&symbols);

        let transport = Arc::clone(&self.transport);
        let message_gone = self.message_gone.clone();

        self.attach_task = Some(tokio::spawn(async move {
            let self_id = transport.current_user_id();

            for symbol in stale {
                if let Err(source) = transport.remove_reaction(handle, symbol, self_id).await {
                    debug!(?source, symbol, "failed to drop stale menu control");
                }
            }

            for symbol in symbols {
                match transport.add_reaction(handle, symbol).await {
                    Ok(()) => {}
                    Err(TransportError::NotFound) => {
                        message_gone.cancel();
                        return;
                    }
                    Err(source) => warn!(?source, symbol, "failed to attach menu control"),
                }
            }
        }));
    }

    async fn await_input(&self, pending: PendingReaction) -> Input {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Input::Cancelled,
            () = self.message_gone.cancelled() => Input::MessageGone,
            signal = tokio::time::timeout(self.timeout, pending) => match signal {
                Err(_) => Input::TimedOut,
                Ok(ReactionSignal::Reacted(event)) => Input::Reacted(event),
                Ok(ReactionSignal::MessageDeleted) => Input::MessageGone,
                Ok(ReactionSignal::Disconnected) => Input::Cancelled,
            },
        }
    }

    async fn dispatch(
        &mut self,
        handle: MessageHandle,
        event: &ReactionEvent,
        control: Control,
    ) -> Option<MenuOutcome> {
        match self
            .transport
            .remove_reaction(handle, &event.emoji, event.user_id)
            .await
        {
            Ok(()) => {}
            Err(TransportError::NotFound) => {
                debug!(message_id = handle.message_id, "menu message vanished mid-dispatch");
                return Some(MenuOutcome::Closed);
            }
            Err(TransportError::Forbidden) => {
                debug!(message_id = handle.message_id, "cannot remove reactions here");
            }
            Err(source) => warn!(?source, "failed to remove menu reaction"),
        }

        match control {
            Control::Navigate(Direction::Next) => self.next_page(),
            Control::Navigate(Direction::Previous) => self.previous_page(),
            Control::Close => return Some(self.close(handle).await),
            Control::SelectItem(position) => return self.select(handle, event, position).await,
        }

        None
    }

    async fn select(
        &mut self,
        handle: MessageHandle,
        event: &ReactionEvent,
        position: usize,
    ) -> Option<MenuOutcome> {
        let (start, _) = page_window(self.items.len(), self.page_size, self.page);
        let index = start + position;
        let item = self.items.get(index)?.clone();

        let selection = MenuSelection {
            label: item.label.clone(),
            index,
            page: self.page,
            user_id: event.user_id,
            message: handle,
        };

        let effect = match item.action.run(selection).await {
            Ok(effect) => effect,
            Err(source) => {
                warn!(?source, label = %item.label, "menu action failed");
                return None;
            }
        };

        match effect {
            MenuEffect::Refresh => None,
            MenuEffect::GoTo(page) => {
                self.set_page(page);
                None
            }
            MenuEffect::Replace(items) => {
                self.reset(items);
                None
            }
            MenuEffect::Close => Some(self.close(handle).await),
        }
    }

    async fn close(&mut self, handle: MessageHandle) -> MenuOutcome {
        self.abort_attach();

        match self.transport.delete_message(handle).await {
            Ok(()) | Err(TransportError::NotFound) => {}
            Err(source) => warn!(?source, message_id = handle.message_id, "failed to delete menu"),
        }

        MenuOutcome::Closed
    }

    /// Shed every control. Falls back to one removal per symbol without
    /// MANAGE_MESSAGES; a vanished message turns the outcome into `Closed`.
    async fn teardown(&mut self, handle: MessageHandle, outcome: MenuOutcome) -> MenuOutcome {
        self.abort_attach();
        let attached = std::mem::take(&mut self.attached);

        match self.transport.remove_all_reactions(handle).await {
            Ok(()) => outcome,
            Err(TransportError::NotFound) => MenuOutcome::Closed,
            Err(TransportError::Forbidden) => {
                debug!(
                    message_id = handle.message_id,
                    "cannot clear reactions, removing menu controls one by one"
                );
                let self_id = self.transport.current_user_id();
                for symbol in attached {
                    if let Err(source) = self.transport.remove_reaction(handle, symbol, self_id).await
                    {
                        debug!(?source, symbol, "failed to remove menu control");
                    }
                }
                outcome
            }
            Err(source) => {
                warn!(?source, message_id = handle.message_id, "failed to clear menu controls");
                outcome
            }
        }
    }

    fn abort_attach(&mut self) {
        if let Some(task) = self.attach_task.take() {
            task.abort();
        }
    }

    fn set_phase(&mut self, phase: MenuPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, page = self.page, "menu phase");
            self.phase = phase;
        }
    }
}

impl<T: MenuTransport + ?Sized + 'static> Drop for MenuSession<T> {
    fn drop(&mut self) {
        self.abort_attach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::controls::{CLOSE_SYMBOL, NAVIGATION_SYMBOLS, NEXT_SYMBOL, PREVIOUS_SYMBOL};
    use crate::menu::mock::{AUTHOR, BOT, CHANNEL, Call, MockTransport, settle, wait_until_armed};

    const STRANGER: u64 = 3;

    fn labelled(count: usize) -> Vec<MenuItem> {
        (0..count)
            .map(|index| {
                MenuItem::new(format!("Item {index}"), |_selection: MenuSelection| async {
                    Ok::<_, anyhow::Error>(MenuEffect::Refresh)
                })
            })
            .collect()
    }

    fn invocation() -> MenuInvocation {
        MenuInvocation {
            channel_id: CHANNEL,
            author_id: AUTHOR,
        }
    }

    fn session(transport: &Arc<MockTransport>, items: Vec<MenuItem>) -> MenuSession<MockTransport> {
        MenuSession::new(
            Arc::clone(transport),
            invocation(),
            "Test menu",
            items,
            5,
            DEFAULT_TIMEOUT,
        )
        .expect("valid page size")
    }

    fn reaction(transport: &MockTransport, user_id: u64, emoji: &str) -> ReactionEvent {
        ReactionEvent {
            channel_id: CHANNEL,
            message_id: transport.message_id(),
            user_id,
            emoji: emoji.to_owned(),
        }
    }

    #[test]
    fn rejects_out_of_range_page_sizes() {
        let transport = Arc::new(MockTransport::new());
        for size in [0, MAX_PAGE_SIZE + 1] {
            let result = MenuSession::new(
                Arc::clone(&transport),
                invocation(),
                "x",
                labelled(3),
                size,
                DEFAULT_TIMEOUT,
            );
            assert_eq!(result.err(), Some(MenuError::InvalidPageSize(size)));
        }
    }

    #[test]
    fn twenty_three_items_make_five_pages() {
        let transport = Arc::new(MockTransport::new());
        let menu = session(&transport, labelled(23));

        assert_eq!(menu.page_count(), 5);
        let sizes: Vec<usize> = menu.pages().map(<[MenuItem]>::len).collect();
        assert_eq!(sizes, vec![5, 5, 5, 5, 3]);
    }

    #[test]
    fn navigation_wraps_around() {
        let transport = Arc::new(MockTransport::new());
        let mut menu = session(&transport, labelled(23)).with_start_page(5);
        assert_eq!(menu.page(), 5);

        menu.next_page();
        assert_eq!(menu.page(), 1);

        menu.previous_page();
        assert_eq!(menu.page(), 5);

        menu.previous_page();
        assert_eq!(menu.page(), 4);
    }

    #[test]
    fn start_page_and_reset_are_clamped() {
        let transport = Arc::new(MockTransport::new());
        let mut menu = session(&transport, labelled(12)).with_start_page(99);
        assert_eq!(menu.page(), 3);
        assert_eq!(menu.current_items().len(), 2);
        assert_eq!(menu.controls().len(), 5);

        menu.reset(labelled(1));
        assert_eq!(menu.page(), 1);
        assert_eq!(menu.page_count(), 1);

        let empty = session(&transport, Vec::new()).with_start_page(0);
        assert_eq!(empty.page(), 1);
        assert!(empty.render_embed().is_ok());
    }

    #[test]
    fn rendered_page_lists_item_symbols() {
        let transport = Arc::new(MockTransport::new());
        let menu = session(&transport, labelled(7)).with_start_page(2);
        let embed = menu.render_embed().expect("valid embed");

        assert_eq!(
            embed.description.as_deref(),
            Some("0\u{fe0f}\u{20e3} Item 5\n1\u{fe0f}\u{20e3} Item 6")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn renders_attaches_and_navigates_in_place() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(23)).spawn();

        wait_until_armed(&transport).await;
        settle().await;

        let mut expected = vec![Call::Send { channel_id: CHANNEL }, Call::Arm];
        expected.extend(
            ControlSet::for_page(5)
                .symbols()
                .into_iter()
                .map(|symbol| Call::AddReaction(symbol.to_owned())),
        );
        assert_eq!(transport.calls(), expected);
        assert_eq!(transport.last_footer().as_deref(), Some("Page 1/5"));

        transport.clear_calls();
        transport.react(&reaction(&transport, AUTHOR, PREVIOUS_SYMBOL));
        wait_until_armed(&transport).await;
        settle().await;

        let calls = transport.calls();
        assert_eq!(
            calls[0],
            Call::RemoveReaction {
                symbol: PREVIOUS_SYMBOL.to_owned(),
                user_id: AUTHOR,
            }
        );
        assert_eq!(calls[1..3], [Call::Edit, Call::Arm]);
        assert!(!calls.contains(&Call::Send { channel_id: CHANNEL }));
        assert_eq!(transport.last_footer().as_deref(), Some("Page 5/5"));

        // Page 5 has three items, so symbols 3 and 4 are dropped.
        for position in [3, 4] {
            assert!(calls.contains(&Call::RemoveReaction {
                symbol: emojit(position).expect("symbol").to_owned(),
                user_id: BOT,
            }));
        }

        transport.react(&reaction(&transport, AUTHOR, NEXT_SYMBOL));
        wait_until_armed(&transport).await;
        assert_eq!(transport.last_footer().as_deref(), Some("Page 1/5"));

        transport.clear_calls();
        transport.react(&reaction(&transport, AUTHOR, CLOSE_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
        assert!(transport.calls().contains(&Call::Delete));
        assert_eq!(transport.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ignores_unrelated_reactions() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(3)).spawn();

        wait_until_armed(&transport).await;
        settle().await;
        transport.clear_calls();

        let mut foreign = reaction(&transport, AUTHOR, NEXT_SYMBOL);
        foreign.message_id += 1;

        assert_eq!(transport.react(&reaction(&transport, BOT, NEXT_SYMBOL)), 0);
        assert_eq!(transport.react(&reaction(&transport, STRANGER, NEXT_SYMBOL)), 0);
        assert_eq!(transport.react(&foreign), 0);
        assert_eq!(transport.react(&reaction(&transport, AUTHOR, "\u{1f600}")), 0);
        // Only three items, so symbol 3 is not a control.
        assert_eq!(transport.react(&reaction(&transport, AUTHOR, emojit(3).expect("symbol"))), 0);

        settle().await;
        assert!(transport.calls().is_empty());
        assert_eq!(transport.pending_count(), 1);

        transport.react(&reaction(&transport, AUTHOR, CLOSE_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_an_item_runs_its_action() {
        let transport = Arc::new(MockTransport::new());
        let (picked_tx, mut picked_rx) = tokio::sync::mpsc::unbounded_channel();

        let items: Vec<MenuItem> = (0..8)
            .map(|index| {
                let picked_tx = picked_tx.clone();
                MenuItem::new(format!("Item {index}"), move |selection: MenuSelection| {
                    let _ = picked_tx.send(selection);
                    async { Ok::<_, anyhow::Error>(MenuEffect::Replace(labelled(2))) }
                })
            })
            .collect();

        let handle = session(&transport, items).with_start_page(2).spawn();
        wait_until_armed(&transport).await;

        transport.react(&reaction(&transport, AUTHOR, "1\u{20e3}"));
        wait_until_armed(&transport).await;

        let selection = picked_rx.recv().await.expect("action ran");
        assert_eq!(selection.label, "Item 6");
        assert_eq!(selection.index, 6);
        assert_eq!(selection.page, 2);
        assert_eq!(selection.user_id, AUTHOR);
        assert_eq!(transport.last_footer().as_deref(), Some("Page 1/1"));

        transport.react(&reaction(&transport, AUTHOR, CLOSE_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_action_keeps_menu_open() {
        let transport = Arc::new(MockTransport::new());
        let items = vec![MenuItem::new("Broken", |_selection: MenuSelection| async {
            Err::<MenuEffect, _>(anyhow::anyhow!("boom"))
        })];

        let handle = session(&transport, items).spawn();
        wait_until_armed(&transport).await;

        transport.react(&reaction(&transport, AUTHOR, emojit(0).expect("symbol")));
        wait_until_armed(&transport).await;
        assert!(transport.calls().contains(&Call::Edit));

        transport.react(&reaction(&transport, AUTHOR, CLOSE_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_menu_expires_and_clears_reactions() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(3)).spawn();

        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Expired);

        let calls = transport.calls();
        assert_eq!(calls.last(), Some(&Call::RemoveAll));
        assert!(!calls.iter().any(|call| matches!(
            call,
            Call::RemoveReaction { user_id, .. } if *user_id == BOT
        )));
        assert_eq!(transport.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn forbidden_clear_falls_back_to_single_removals() {
        let transport = Arc::new(MockTransport::new());
        transport.forbid_remove_all();
        let handle = session(&transport, labelled(2)).spawn();

        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Expired);

        let calls = transport.calls();
        let position = calls
            .iter()
            .position(|call| *call == Call::RemoveAll)
            .expect("bulk removal attempted");

        let removed: Vec<Call> = calls[position + 1..].to_vec();
        let expected: Vec<Call> = ControlSet::for_page(2)
            .symbols()
            .into_iter()
            .map(|symbol| Call::RemoveReaction {
                symbol: symbol.to_owned(),
                user_id: BOT,
            })
            .collect();
        assert_eq!(removed, expected);
        assert_eq!(removed.len(), NAVIGATION_SYMBOLS.len() + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn deleted_message_closes_on_timeout_cleanup() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(3)).spawn();

        wait_until_armed(&transport).await;
        settle().await;
        transport.delete_externally();
        transport.clear_calls();

        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
        assert_eq!(transport.calls(), vec![Call::RemoveAll]);
    }

    #[tokio::test(start_paused = true)]
    async fn deleted_message_closes_on_next_reaction() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(3)).spawn();

        wait_until_armed(&transport).await;
        settle().await;
        transport.delete_externally();
        transport.clear_calls();

        transport.react(&reaction(&transport, AUTHOR, NEXT_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
        assert_eq!(
            transport.calls(),
            vec![Call::RemoveReaction {
                symbol: NEXT_SYMBOL.to_owned(),
                user_id: AUTHOR,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn message_lost_while_attaching_closes_without_teardown() {
        let transport = Arc::new(MockTransport::new());
        transport.lose_message_on_add_reaction();
        let handle = session(&transport, labelled(3)).spawn();

        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
        assert_eq!(
            transport.calls(),
            vec![
                Call::Send { channel_id: CHANNEL },
                Call::Arm,
                Call::AddReaction(PREVIOUS_SYMBOL.to_owned()),
            ]
        );
        assert_eq!(transport.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn message_lost_before_rerender_closes_without_teardown() {
        let transport = Arc::new(MockTransport::new());
        transport.lose_message_on_edit();
        let handle = session(&transport, labelled(23)).spawn();

        wait_until_armed(&transport).await;
        settle().await;
        transport.clear_calls();

        transport.react(&reaction(&transport, AUTHOR, NEXT_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);

        let calls = transport.calls();
        assert_eq!(
            calls,
            vec![
                Call::RemoveReaction {
                    symbol: NEXT_SYMBOL.to_owned(),
                    user_id: AUTHOR,
                },
                Call::Edit,
            ]
        );
        assert!(!calls.contains(&Call::RemoveAll));
        assert!(!calls.contains(&Call::Delete));
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_delete_notice_closes_without_calls() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(3)).spawn();

        wait_until_armed(&transport).await;
        settle().await;
        transport.clear_calls();

        assert_eq!(transport.waiters().notify_deleted(transport.message_id()), 1);
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_tears_down_like_timeout() {
        let transport = Arc::new(MockTransport::new());
        let token = CancellationToken::new();
        let handle = session(&transport, labelled(3))
            .with_cancellation(token.clone())
            .spawn();

        wait_until_armed(&transport).await;
        settle().await;
        token.cancel();

        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Cancelled);
        assert_eq!(transport.calls().last(), Some(&Call::RemoveAll));
        assert_eq!(transport.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn active_menu_resets_timeout_each_cycle() {
        let transport = Arc::new(MockTransport::new());
        let handle = session(&transport, labelled(23)).spawn();

        for _ in 0..3 {
            wait_until_armed(&transport).await;
            tokio::time::sleep(DEFAULT_TIMEOUT - Duration::from_secs(5)).await;
            transport.react(&reaction(&transport, AUTHOR, NEXT_SYMBOL));
        }

        wait_until_armed(&transport).await;
        assert_eq!(transport.last_footer().as_deref(), Some("Page 4/5"));

        transport.react(&reaction(&transport, AUTHOR, CLOSE_SYMBOL));
        assert_eq!(handle.await.expect("menu task"), MenuOutcome::Closed);
    }
}
