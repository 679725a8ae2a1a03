//! Predicates deciding whether a reaction belongs to an open menu.

use std::sync::{Mutex, PoisonError};

use super::controls::same_symbol;

/// Tick and cross, in that order. Index 0 means "yes".
pub const YES_OR_NO_SYMBOLS: [&str; 2] = ["\u{2705}", "\u{274e}"];

/// A reaction added to a message, reduced to what menus care about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionEvent {
    pub channel_id: u64,
    pub message_id: u64,
    pub user_id: u64,
    /// Unicode emoji, or the custom emoji name.
    pub emoji: String,
}

/// Which events a matcher considers at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReactionScope {
    /// The bot's own user; its reactions never match.
    pub self_id: u64,
    /// Only reactions on this message. `None` accepts any message.
    pub message_id: Option<u64>,
    /// Only reactions from this user. `None` accepts any user.
    pub user_id: Option<u64>,
}

impl ReactionScope {
    pub fn new(self_id: u64) -> Self {
        Self {
            self_id,
            message_id: None,
            user_id: None,
        }
    }

    pub fn message(mut self, message_id: u64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Whether the event comes from the right user on the right message.
    pub fn contains(&self, event: &ReactionEvent) -> bool {
        event.user_id != self.self_id
            && self.message_id.is_none_or(|id| id == event.message_id)
            && self.user_id.is_none_or(|id| id == event.user_id)
    }
}

/// Reusable reaction predicate.
///
/// `test` only answers yes or no; the index of the candidate emoji that
/// matched is stored as a side effect and read back with [`last_match`].
///
/// [`last_match`]: ReactionMatcher::last_match
#[derive(Debug)]
pub struct ReactionMatcher {
    scope: ReactionScope,
    /// `None` accepts any emoji.
    candidates: Option<Vec<String>>,
    last_match: Mutex<Option<usize>>,
}

impl ReactionMatcher {
    /// Match any emoji inside `scope`.
    pub fn same_context(scope: ReactionScope) -> Self {
        Self {
            scope,
            candidates: None,
            last_match: Mutex::new(None),
        }
    }

    /// Match one of `emojis` inside `scope`. `last_match` is the index into `emojis`.
    pub fn with_emojis<I, S>(scope: ReactionScope, emojis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope,
            candidates: Some(emojis.into_iter().map(Into::into).collect()),
            last_match: Mutex::new(None),
        }
    }

    /// Match a tick or a cross. See [`ReactionMatcher::answer`].
    pub fn yes_or_no(scope: ReactionScope) -> Self {
        Self::with_emojis(scope, YES_OR_NO_SYMBOLS)
    }

    pub fn scope(&self) -> &ReactionScope {
        &self.scope
    }

    /// Candidate emoji, or `None` when every emoji is accepted.
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }

    /// Evaluate the predicate, recording the matched index on success.
    pub fn test(&self, event: &ReactionEvent) -> bool {
        if !self.scope.contains(event) {
            return false;
        }

        let Some(candidates) = &self.candidates else {
            return true;
        };

        let Some(index) = candidates
            .iter()
            .position(|candidate| same_symbol(candidate, &event.emoji))
        else {
            return false;
        };

        *self.last_match.lock().unwrap_or_else(PoisonError::into_inner) = Some(index);
        true
    }

    /// Index of the candidate matched by the most recent successful `test`.
    pub fn last_match(&self) -> Option<usize> {
        *self.last_match.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// For [`ReactionMatcher::yes_or_no`]: `Some(true)` after a tick.
    pub fn answer(&self) -> Option<bool> {
        self.last_match().map(|index| index == 0)
    }
}
