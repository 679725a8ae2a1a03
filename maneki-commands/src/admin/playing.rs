use tracing::info;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "playing",
    aliases: &["changeplaying"],
    desc: "Change the game the bot is playing.",
    category: "admin",
    usage: "!!playing <text>",
};

/// Update the bot's "Playing" status. Guardians only.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, text: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;

    if !ctx.config.is_guardian(msg.author.id.get()) {
        http.create_message(msg.channel_id).content("No!").await?;
        return Ok(());
    }

    let Some(text) = text else {
        let usage = format!("Usage: `{}`", META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    ctx.set_activity(text)?;
    info!(activity = text, user_id = msg.author.id.get(), "activity changed");

    Ok(())
}
