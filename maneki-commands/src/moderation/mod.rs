pub mod ban;
pub mod kick;

use tracing::error;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    guild::Permissions,
    id::{Id, marker::UserMarker},
};

use maneki_core::Context;
use maneki_utils::menu::TransportError;
use maneki_utils::parse::parse_target_user_id;
use maneki_utils::permissions::{AuthorCheck, check_author_permission, member_roles};

/// A member removal the bot can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    Kick,
    Ban,
}

impl Removal {
    fn verb(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Ban => "ban",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Self::Kick => "kicked",
            Self::Ban => "banned",
        }
    }

    fn permission(self) -> Permissions {
        match self {
            Self::Kick => Permissions::KICK_MEMBERS,
            Self::Ban => Permissions::BAN_MEMBERS,
        }
    }
}

/// Why a removal was refused before reaching Discord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Refusal {
    SelfTarget,
    BotTarget,
    Outranked,
}

impl Refusal {
    fn message(self, removal: Removal) -> String {
        let verb = removal.verb();
        match self {
            Self::SelfTarget => format!("You can't {verb} yourself!"),
            Self::BotTarget => format!("I'm not gonna {verb} myself..."),
            Self::Outranked => {
                format!("They have more authority than you, so I can't {verb} them.")
            }
        }
    }
}

fn check_identity(
    author: Id<UserMarker>,
    target: Id<UserMarker>,
    bot_user_id: u64,
) -> Result<(), Refusal> {
    if target == author {
        return Err(Refusal::SelfTarget);
    }
    if target.get() == bot_user_id {
        return Err(Refusal::BotTarget);
    }
    Ok(())
}

fn check_hierarchy(author_top: i64, target_top: i64) -> Result<(), Refusal> {
    if author_top < target_top {
        return Err(Refusal::Outranked);
    }
    Ok(())
}

/// Validate and perform `removal` on the member named by `arg1`.
pub async fn remove_member(
    ctx: &Context,
    msg: &MessageCreate,
    arg1: Option<&str>,
    removal: Removal,
    usage: &str,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let (roles, author_roles) =
        match check_author_permission(http, msg, removal.permission()).await? {
            AuthorCheck::Granted {
                roles,
                author_roles,
            } => (roles, author_roles),
            AuthorCheck::OutsideGuild => {
                http.create_message(msg.channel_id)
                    .content("This command only works in servers.")
                    .await?;
                return Ok(());
            }
            AuthorCheck::Denied => {
                http.create_message(msg.channel_id)
                    .content("You are not permitted to use this command.")
                    .await?;
                return Ok(());
            }
        };
    let guild_id = roles.guild_id();

    let Some(target) = arg1.and_then(parse_target_user_id) else {
        let usage = format!("Usage: `{usage}`");
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let refusal = match check_identity(msg.author.id, target, ctx.bot_user_id) {
        Ok(()) => {
            let target_roles = member_roles(http, guild_id, target).await?;
            check_hierarchy(
                roles.top_position(&author_roles),
                roles.top_position(&target_roles),
            )
            .err()
        }
        Err(refusal) => Some(refusal),
    };

    if let Some(refusal) = refusal {
        let out = refusal.message(removal);
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let result = match removal {
        Removal::Kick => http.remove_guild_member(guild_id, target).await,
        Removal::Ban => http.create_ban(guild_id, target).await,
    };

    match result.map_err(TransportError::from) {
        Ok(_) => {}
        Err(TransportError::Forbidden) => {
            let out = format!("I'm not allowed to {}.", removal.verb());
            http.create_message(msg.channel_id).content(&out).await?;
            return Ok(());
        }
        Err(source) => {
            error!(?source, action = removal.verb(), "member removal failed");
            let out = format!("I couldn't {} that user.", removal.verb());
            http.create_message(msg.channel_id).content(&out).await?;
            return Ok(());
        }
    }

    let guild = http.guild(guild_id).await?.model().await?;
    let out = format!("<@{target}> was {} from {}", removal.past_tense(), guild.name);
    http.create_message(msg.channel_id).content(&out).await?;

    Ok(())
}
