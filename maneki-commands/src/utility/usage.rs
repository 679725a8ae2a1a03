use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{CommandMeta, find_command};
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    aliases: &[],
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!!usage <command>",
};

/// Show usage for a specific command.
///
/// Missing argument returns this command's usage; an unknown command gets a
/// short not-found message.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let out = usage_reply(arg1);
    http.create_message(msg.channel_id).content(&out).await?;

    Ok(())
}

fn usage_reply(arg1: Option<&str>) -> String {
    let Some(raw_name) = arg1 else {
        return format!("Usage: `{}`", META.usage);
    };

    match find_command(raw_name) {
        Some(command) => format!("Usage: `{}`", command.usage),
        None => format!("Unknown command: `{}`", raw_name.trim()),
    }
}
