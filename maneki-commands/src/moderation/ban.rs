use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::moderation::{Removal, remove_member};
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    aliases: &[],
    desc: "Ban a member from the server.",
    category: "moderation",
    usage: "!!ban <member>",
};

pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    remove_member(&ctx, &msg, arg1, Removal::Ban, META.usage).await
}
