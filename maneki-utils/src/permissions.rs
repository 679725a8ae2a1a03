use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    guild::Permissions,
    id::{
        Id,
        marker::{GuildMarker, RoleMarker, UserMarker},
    },
};

/// Whether `granted` covers `required`. Administrators pass every check.
pub fn grants(granted: Permissions, required: Permissions) -> bool {
    granted.contains(Permissions::ADMINISTRATOR) || granted.contains(required)
}

/// One guild's role table: permissions and hierarchy position per role.
#[derive(Clone, Debug)]
pub struct GuildRoles {
    guild_id: Id<GuildMarker>,
    roles: Vec<(Id<RoleMarker>, i64, Permissions)>,
}

impl GuildRoles {
    pub fn new(
        guild_id: Id<GuildMarker>,
        roles: impl IntoIterator<Item = (Id<RoleMarker>, i64, Permissions)>,
    ) -> Self {
        Self {
            guild_id,
            roles: roles.into_iter().collect(),
        }
    }

    pub async fn fetch(http: &Client, guild_id: Id<GuildMarker>) -> anyhow::Result<Self> {
        let roles = http.roles(guild_id).await?.model().await?;

        Ok(Self::new(
            guild_id,
            roles
                .into_iter()
                .map(|role| (role.id, role.position, role.permissions)),
        ))
    }

    pub fn guild_id(&self) -> Id<GuildMarker> {
        self.guild_id
    }

    /// Union of @everyone and every role in `member_roles`.
    pub fn permissions(&self, member_roles: &[Id<RoleMarker>]) -> Permissions {
        let everyone: Id<RoleMarker> = self.guild_id.cast();

        self.roles
            .iter()
            .filter(|(id, _, _)| *id == everyone || member_roles.contains(id))
            .fold(Permissions::empty(), |granted, (_, _, permissions)| {
                granted | *permissions
            })
    }

    /// Position of the highest role in `member_roles`; `0` (@everyone) if none is known.
    pub fn top_position(&self, member_roles: &[Id<RoleMarker>]) -> i64 {
        self.roles
            .iter()
            .filter(|(id, _, _)| member_roles.contains(id))
            .map(|(_, position, _)| *position)
            .max()
            .unwrap_or(0)
    }
}

/// Outcome of checking a message author against a guild permission.
#[derive(Clone, Debug)]
pub enum AuthorCheck {
    /// The message was not sent in a guild.
    OutsideGuild,
    Denied,
    /// Allowed; carries what the check loaded so callers can reuse it.
    Granted {
        roles: GuildRoles,
        author_roles: Vec<Id<RoleMarker>>,
    },
}

/// Check whether the message author holds `required` in the message's guild.
///
/// Uses the member payload on the message when present and fetches the
/// member otherwise. The guild's role table is loaded once.
pub async fn check_author_permission(
    http: &Client,
    msg: &MessageCreate,
    required: Permissions,
) -> anyhow::Result<AuthorCheck> {
    let Some(guild_id) = msg.guild_id else {
        return Ok(AuthorCheck::OutsideGuild);
    };

    let author_roles = match msg.member.as_ref() {
        Some(member) => member.roles.clone(),
        None => member_roles(http, guild_id, msg.author.id).await?,
    };

    let roles = GuildRoles::fetch(http, guild_id).await?;

    // Discord precomputes permissions on some payloads.
    let granted = msg
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .unwrap_or_else(|| roles.permissions(&author_roles));

    if !grants(granted, required) {
        return Ok(AuthorCheck::Denied);
    }

    Ok(AuthorCheck::Granted {
        roles,
        author_roles,
    })
}

pub async fn member_roles(
    http: &Client,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
) -> anyhow::Result<Vec<Id<RoleMarker>>> {
    let member = http.guild_member(guild_id, user_id).await?.model().await?;
    Ok(member.roles)
}
