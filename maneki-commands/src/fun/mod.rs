pub mod headpat;
pub mod hug;
pub mod wave;

use tracing::warn;
use twilight_model::{
    channel::message::embed::Embed,
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::UserMarker},
};

use maneki_core::Context;
use maneki_utils::embed::{image_embed, notice_embed};
use maneki_utils::parse::parse_target_user_id;

/// Who an affectionate command is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Nobody,
    Author,
    Bot,
    Member(Id<UserMarker>),
}

impl Target {
    /// `None` when `arg1` is present but not a user.
    pub fn resolve(arg1: Option<&str>, author: Id<UserMarker>, bot_user_id: u64) -> Option<Self> {
        let Some(raw) = arg1 else {
            return Some(Self::Nobody);
        };

        let user_id = parse_target_user_id(raw)?;
        Some(if user_id == author {
            Self::Author
        } else if user_id.get() == bot_user_id {
            Self::Bot
        } else {
            Self::Member(user_id)
        })
    }
}

/// Why an image reply fell back to a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GifUnavailable {
    NotConfigured,
    NoResults,
    LookupFailed,
}

impl GifUnavailable {
    fn notice(self) -> anyhow::Result<Embed> {
        let description = match self {
            Self::NotConfigured => "GIF lookups are not configured.",
            Self::NoResults => "I couldn't find a fitting GIF this time.",
            Self::LookupFailed => "I couldn't reach Giphy right now.",
        };
        notice_embed("No GIF", description)
    }
}

/// Look up a GIF for `query` and post it with `caption`.
pub async fn send_gif(
    ctx: &Context,
    msg: &MessageCreate,
    query: &str,
    caption: Option<String>,
) -> anyhow::Result<()> {
    let lookup = match ctx.giphy.as_ref() {
        None => Err(GifUnavailable::NotConfigured),
        Some(giphy) => match giphy.search_gif(query).await {
            Ok(Some(url)) => Ok(url),
            Ok(None) => Err(GifUnavailable::NoResults),
            Err(source) => {
                warn!(?source, query, "giphy lookup failed");
                Err(GifUnavailable::LookupFailed)
            }
        },
    };

    let embed = match lookup {
        Ok(url) => image_embed(caption.as_deref(), &url)?,
        Err(unavailable) => unavailable.notice()?,
    };
    ctx.http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
