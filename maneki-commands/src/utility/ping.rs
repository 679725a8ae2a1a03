use std::time::{Duration, Instant};

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use maneki_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    aliases: &[],
    desc: "Replies with Pong! and the API round trip.",
    category: "utility",
    usage: "!!ping",
};

/// Reply, then edit the reply with how long the send took.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;

    let started = Instant::now();
    let reply = http
        .create_message(msg.channel_id)
        .content(&pong_text(None))
        .await?
        .model()
        .await?;
    let round_trip = started.elapsed();

    let out = pong_text(Some(round_trip));
    http.update_message(reply.channel_id, reply.id)
        .content(Some(out.as_str()))
        .await?;

    Ok(())
}

fn pong_text(round_trip: Option<Duration>) -> String {
    match round_trip {
        Some(elapsed) => format!("Pong! ({} ms)", elapsed.as_millis()),
        None => "Pong!".to_owned(),
    }
}
