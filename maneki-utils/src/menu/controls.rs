//! Emoji controls attached to a reaction menu.

/// Go back one page.
pub const PREVIOUS_SYMBOL: &str = "\u{2b05}\u{fe0f}";
/// Delete the menu message.
pub const CLOSE_SYMBOL: &str = "\u{274c}";
/// Go forward one page.
pub const NEXT_SYMBOL: &str = "\u{27a1}\u{fe0f}";

/// Navigation symbols in the order they are attached.
pub const NAVIGATION_SYMBOLS: [&str; 3] = [PREVIOUS_SYMBOL, CLOSE_SYMBOL, NEXT_SYMBOL];

/// Keycap digits 0-9 followed by regional indicators A-Z.
const ITEM_SYMBOLS: [&str; 36] = [
    "0\u{fe0f}\u{20e3}",
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
    "\u{1f1e6}",
    "\u{1f1e7}",
    "\u{1f1e8}",
    "\u{1f1e9}",
    "\u{1f1ea}",
    "\u{1f1eb}",
    "\u{1f1ec}",
    "\u{1f1ed}",
    "\u{1f1ee}",
    "\u{1f1ef}",
    "\u{1f1f0}",
    "\u{1f1f1}",
    "\u{1f1f2}",
    "\u{1f1f3}",
    "\u{1f1f4}",
    "\u{1f1f5}",
    "\u{1f1f6}",
    "\u{1f1f7}",
    "\u{1f1f8}",
    "\u{1f1f9}",
    "\u{1f1fa}",
    "\u{1f1fb}",
    "\u{1f1fc}",
    "\u{1f1fd}",
    "\u{1f1fe}",
    "\u{1f1ff}",
];

/// Number of distinct item positions a page can address.
pub const MAX_ITEM_SYMBOLS: usize = ITEM_SYMBOLS.len();

/// Symbol for a zero-based item position on a page.
pub fn emojit(position: usize) -> Option<&'static str> {
    ITEM_SYMBOLS.get(position).copied()
}

/// Reverse of [`emojit`].
pub fn position_of(symbol: &str) -> Option<usize> {
    ITEM_SYMBOLS
        .iter()
        .position(|candidate| same_symbol(candidate, symbol))
}

/// Compare two emoji, ignoring the U+FE0F variation selector.
///
/// Discord echoes reactions with or without the selector depending on the
/// client that added them.
pub fn same_symbol(left: &str, right: &str) -> bool {
    left.chars()
        .filter(|ch| *ch != '\u{fe0f}')
        .eq(right.chars().filter(|ch| *ch != '\u{fe0f}'))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// What a menu does when one of its symbols is reacted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Navigate(Direction),
    Close,
    /// Zero-based position on the current page.
    SelectItem(usize),
}

/// Ordered symbol → control mapping for one rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlSet {
    entries: Vec<(&'static str, Control)>,
}

impl ControlSet {
    /// Navigation triad plus one control per item on the page.
    ///
    /// Items beyond [`MAX_ITEM_SYMBOLS`] get no control.
    pub fn for_page(item_count: usize) -> Self {
        let mut entries = vec![
            (PREVIOUS_SYMBOL, Control::Navigate(Direction::Previous)),
            (CLOSE_SYMBOL, Control::Close),
            (NEXT_SYMBOL, Control::Navigate(Direction::Next)),
        ];

        entries.extend(
            ITEM_SYMBOLS
                .iter()
                .take(item_count)
                .enumerate()
                .map(|(position, symbol)| (*symbol, Control::SelectItem(position))),
        );

        Self { entries }
    }

    /// Symbols in attach order.
    pub fn symbols(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(symbol, _)| *symbol).collect()
    }

    /// Control at the given attach-order index.
    pub fn get(&self, index: usize) -> Option<Control> {
        self.entries.get(index).map(|(_, control)| *control)
    }

    /// Control bound to `symbol`, if any.
    pub fn resolve(&self, symbol: &str) -> Option<Control> {
        self.entries
            .iter()
            .find(|(candidate, _)| same_symbol(candidate, symbol))
            .map(|(_, control)| *control)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
