use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::moderation::{Removal, remove_member};
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "kick",
    aliases: &[],
    desc: "Kick a member from the server.",
    category: "moderation",
    usage: "!!kick <member>",
};

pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    remove_member(&ctx, &msg, arg1, Removal::Kick, META.usage).await
}
