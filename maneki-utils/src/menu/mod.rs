//! Reaction-driven paginated menus.
//!
//! A [`MenuSession`] owns one message, renders a page of [`MenuItem`]s into it
//! and reacts to the invoking author's emoji. Reactions reach sessions through
//! the shared [`ReactionWaiters`] hub, which the gateway loop feeds.

mod controls;
mod matcher;
mod paginate;
mod session;
mod transport;
mod twilight;
mod waiters;

#[cfg(test)]
mod mock;

pub use controls::{
    CLOSE_SYMBOL, Control, ControlSet, Direction, MAX_ITEM_SYMBOLS, NAVIGATION_SYMBOLS,
    NEXT_SYMBOL, PREVIOUS_SYMBOL, emojit, position_of, same_symbol,
};
pub use matcher::{ReactionEvent, ReactionMatcher, ReactionScope, YES_OR_NO_SYMBOLS};
pub use paginate::{
    MAX_PAGE_SIZE, Pages, clamp, clamp_page, page_count, page_window, paginate,
};
pub use session::{
    DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT, MenuAction, MenuEffect, MenuError, MenuInvocation,
    MenuItem, MenuOutcome, MenuSelection, MenuSession,
};
pub use transport::{MenuTransport, MessageHandle, TransportError, TransportResult};
pub use twilight::{TwilightTransport, reaction_event};
pub use waiters::{PendingReaction, ReactionSignal, ReactionWaiters};
