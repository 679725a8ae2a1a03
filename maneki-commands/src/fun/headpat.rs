use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::UserMarker},
};

use crate::CommandMeta;
use crate::fun::{Target, send_gif};
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "headpat",
    aliases: &["pat"],
    desc: "Give someone a head pat.",
    category: "fun",
    usage: "!!headpat [member]",
};

const QUERY: &str = "headpat anime";

pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let Some(target) = Target::resolve(arg1, msg.author.id, ctx.bot_user_id) else {
        let usage = format!("Usage: `{}`", META.usage);
        ctx.http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    send_gif(&ctx, &msg, QUERY, Some(caption(target, msg.author.id))).await
}

fn caption(target: Target, author: Id<UserMarker>) -> String {
    match target {
        Target::Nobody => format!("<@{author}> patted my head! <3"),
        Target::Author => format!("I'm patting <@{author}>'s head!"),
        Target::Bot => format!("My head was patted by <@{author}>! <3"),
        Target::Member(member) => format!("<@{member}> just got a head pat from me!"),
    }
}
