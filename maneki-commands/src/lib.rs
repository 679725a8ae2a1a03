pub mod admin;
pub mod fun;
pub mod menus;
pub mod moderation;
pub mod utility;

use tracing::debug;
use twilight_model::gateway::payload::incoming::MessageCreate;

use maneki_core::Context;
use maneki_utils::COMMAND_PREFIX;
use maneki_utils::parse::parse_invocation;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

impl CommandMeta {
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    utility::menutest::META,
    fun::hug::META,
    fun::wave::META,
    fun::headpat::META,
    moderation::kick::META,
    moderation::ban::META,
    admin::playing::META,
    // Add new commands here
];

/// Look a command up by name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandMeta> {
    let name = name.trim().trim_start_matches(COMMAND_PREFIX).to_lowercase();
    COMMANDS.iter().find(|command| command.answers_to(&name))
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some(invocation) = parse_invocation(&msg.content, COMMAND_PREFIX) else {
        return Ok(());
    };

    let Some(command) = find_command(&invocation.name) else {
        return Ok(());
    };

    debug!(
        command = command.name,
        author_id = msg.author.id.get(),
        channel_id = msg.channel_id.get(),
        "dispatching command"
    );

    let arg1 = invocation.first_arg();
    let rest = invocation.rest();

    match command.name {
        "ping" => utility::ping::run(ctx, msg).await?,
        "help" => utility::help::run(ctx, msg).await?,
        "usage" => utility::usage::run(ctx, msg, arg1).await?,
        "menutest" => utility::menutest::run(ctx, msg).await?,

        "hug" => fun::hug::run(ctx, msg, arg1).await?,
        "wave" => fun::wave::run(ctx, msg).await?,
        "headpat" => fun::headpat::run(ctx, msg, arg1).await?,

        "kick" => moderation::kick::run(ctx, msg, arg1).await?,
        "ban" => moderation::ban::run(ctx, msg, arg1).await?,

        "playing" => admin::playing::run(ctx, msg, rest.as_deref()).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}
