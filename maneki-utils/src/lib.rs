/// Embed builders shared across commands and menus.
pub mod embed;
/// Outbound GIF lookups.
pub mod giphy;
/// Reaction-driven paginated menus.
pub mod menu;
/// Pure parser helpers.
pub mod parse;
/// Permission and role hierarchy helpers.
pub mod permissions;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: &str = "!!";
