use std::sync::Arc;

use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::ChannelMarker},
};

use crate::CommandMeta;
use crate::menus::open_menu;
use maneki_core::Context;
use maneki_utils::menu::{DEFAULT_PAGE_SIZE, MenuEffect, MenuItem, MenuSelection};

pub const META: CommandMeta = CommandMeta {
    name: "menutest",
    aliases: &[],
    desc: "Open a sample reaction menu.",
    category: "utility",
    usage: "!!menutest",
};

const OPTION_COUNT: usize = 22;
const REVERSE_LABEL: &str = "Reverse order";

/// Open a 23-entry menu for trying out reaction navigation.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let items = sample_items(&ctx.http, msg.channel_id, false);
    open_menu(&ctx, &msg, "Menu test", items, DEFAULT_PAGE_SIZE)
}

fn sample_labels(reversed: bool) -> Vec<String> {
    let mut labels: Vec<String> = (1..=OPTION_COUNT)
        .map(|number| format!("Option {number}"))
        .collect();
    if reversed {
        labels.reverse();
    }
    labels.push(REVERSE_LABEL.to_owned());
    labels
}

fn sample_items(http: &Arc<Client>, channel_id: Id<ChannelMarker>, reversed: bool) -> Vec<MenuItem> {
    sample_labels(reversed)
        .into_iter()
        .map(|label| {
            let http = Arc::clone(http);

            if label == REVERSE_LABEL {
                return MenuItem::new(label, move |_selection: MenuSelection| {
                    let items = sample_items(&http, channel_id, !reversed);
                    async move { Ok::<_, anyhow::Error>(MenuEffect::Replace(items)) }
                });
            }

            MenuItem::new(label, move |selection: MenuSelection| {
                let http = Arc::clone(&http);
                async move {
                    let out = format!(
                        "<@{}> picked **{}** from page {}.",
                        selection.user_id, selection.label, selection.page
                    );
                    http.create_message(channel_id).content(&out).await?;
                    Ok::<_, anyhow::Error>(MenuEffect::Refresh)
                }
            })
        })
        .collect()
}
