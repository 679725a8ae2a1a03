//! Glue between command handlers and reaction menu sessions.

use std::sync::Arc;

use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::ChannelMarker},
};

use maneki_core::Context;
use maneki_utils::menu::{MenuEffect, MenuInvocation, MenuItem, MenuSelection, MenuSession};

/// Open a menu in the message's channel, owned by its author.
///
/// The session runs on its own tracked task and stops with the bot.
pub fn open_menu(
    ctx: &Context,
    msg: &MessageCreate,
    title: &str,
    items: Vec<MenuItem>,
    page_size: usize,
) -> anyhow::Result<()> {
    let invocation = MenuInvocation {
        channel_id: msg.channel_id.get(),
        author_id: msg.author.id.get(),
    };

    let session = MenuSession::new(
        ctx.menu_transport(),
        invocation,
        title,
        items,
        page_size,
        ctx.config.menu_timeout,
    )?
    .with_cancellation(ctx.shutdown.child_token());

    drop(ctx.menus.spawn(session.run()));

    Ok(())
}

/// Menu item that posts `text` into `channel_id` and leaves the menu as is.
pub fn reply_item(
    label: impl Into<String>,
    http: &Arc<Client>,
    channel_id: Id<ChannelMarker>,
    text: String,
) -> MenuItem {
    let http = Arc::clone(http);

    MenuItem::new(label, move |_selection: MenuSelection| {
        let http = Arc::clone(&http);
        let text = text.clone();
        async move {
            http.create_message(channel_id).content(&text).await?;
            Ok::<_, anyhow::Error>(MenuEffect::Refresh)
        }
    })
}
