use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::menus::{open_menu, reply_item};
use crate::{COMMANDS, CommandMeta};
use maneki_core::Context;
use maneki_utils::menu::{DEFAULT_PAGE_SIZE, MenuItem};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    aliases: &[],
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!!help",
};

/// Open a menu over every command; picking one posts its usage.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let items: Vec<MenuItem> = sorted_commands()
        .into_iter()
        .map(|command| {
            reply_item(
                help_label(command),
                &ctx.http,
                msg.channel_id,
                help_details(command),
            )
        })
        .collect();

    open_menu(&ctx, &msg, "Commands", items, DEFAULT_PAGE_SIZE)
}

fn sorted_commands() -> Vec<&'static CommandMeta> {
    let mut commands: Vec<&CommandMeta> = COMMANDS.iter().collect();
    commands.sort_by_key(|command| (command.category, command.name));
    commands
}

fn help_label(command: &CommandMeta) -> String {
    format!("**{}** ({})", command.name, command.category)
}

fn help_details(command: &CommandMeta) -> String {
    let mut out = format!("**{}**: {}\nUsage: `{}`", command.name, command.desc, command.usage);
    if !command.aliases.is_empty() {
        out.push_str(&format!("\nAliases: {}", command.aliases.join(", ")));
    }
    out
}
