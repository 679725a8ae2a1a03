use twilight_model::id::{Id, marker::UserMarker};

/// A prefixed command split into its name and arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Lower-cased command name.
    pub name: String,
    /// Whitespace-separated arguments after the name.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Every argument joined back with single spaces, or `None` if there are none.
    pub fn rest(&self) -> Option<String> {
        (!self.args.is_empty()).then(|| self.args.join(" "))
    }
}

/// Split `content` into a command invocation if it starts with `prefix`.
///
/// Returns `None` for unprefixed messages and for a bare prefix.
pub fn parse_invocation(content: &str, prefix: &str) -> Option<Invocation> {
    let body = content.trim().strip_prefix(prefix)?;
    let mut words = body.split_whitespace();

    // "!! ping" is not a command.
    if body.starts_with(char::is_whitespace) {
        return None;
    }

    let name = words.next()?.to_lowercase();
    let args = words.map(ToOwned::to_owned).collect();

    Some(Invocation { name, args })
}

/// Parse a target user from a raw argument (`<@id>`, `<@!id>`, or raw ID).
pub fn parse_target_user_id(raw: &str) -> Option<Id<UserMarker>> {
    let trimmed = raw.trim();

    let numeric = if trimmed.starts_with("<@") && trimmed.ends_with('>') {
        let without_wrappers = trimmed.strip_prefix("<@")?.strip_suffix('>')?;
        without_wrappers
            .strip_prefix('!')
            .unwrap_or(without_wrappers)
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok()?;

    Id::new_checked(id)
}
