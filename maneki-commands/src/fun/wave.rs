use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::fun::send_gif;
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "wave",
    aliases: &[],
    desc: "Wave at the channel.",
    category: "fun",
    usage: "!!wave",
};

pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    send_gif(&ctx, &msg, "kawaii wave", None).await
}
