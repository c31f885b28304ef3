//! Discord [`Chat`] implementation.

use std::{num::NonZeroU64, sync::Arc};

use common::operations::{By, Delete, Insert, Publish, Select, Update};
use derive_more::Debug;
use serenity::{
    builder::EditMember,
    http::{Http, HttpError},
    model::id::{ChannelId, GuildId, RoleId, UserId},
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        member::{self, Freshness},
        role, Member, Notification,
    },
    infra::{chat, Chat},
};

/// JSON error code Discord responds with for an unknown guild.
const UNKNOWN_GUILD: isize = 10004;

/// [`Discord`] gateway configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// ID of the guild to synchronize.
    pub guild_id: NonZeroU64,

    /// ID of the channel to publish [`Notification`]s to.
    pub notify_channel_id: NonZeroU64,
}

/// [`Chat`] gateway backed by the Discord REST API.
#[derive(Clone, Debug)]
pub struct Discord {
    /// Discord REST client.
    #[debug(skip)]
    http: Arc<Http>,

    /// Guild being synchronized.
    guild: GuildId,

    /// Channel receiving [`Notification`]s.
    channel: ChannelId,
}

impl Discord {
    /// Creates a new [`Discord`] gateway operating via the provided [`Http`]
    /// client.
    #[must_use]
    pub fn new(http: Arc<Http>, config: Config) -> Self {
        Self {
            http,
            guild: GuildId::from(config.guild_id),
            channel: ChannelId::from(config.notify_channel_id),
        }
    }

    /// Parses the provided [`member::Id`] into a Discord [`UserId`].
    fn user_id(id: &member::Id) -> Option<UserId> {
        let id: &str = id.as_ref();
        id.parse::<NonZeroU64>().ok().map(UserId::from)
    }

    /// Parses the provided [`member::Id`] of a [`Member`] to be mutated.
    fn target(id: &member::Id) -> Result<UserId, Traced<chat::Error>> {
        Self::user_id(id)
            .ok_or_else(|| chat::Error::new(format!("invalid user ID `{id}`")))
            .map_err(tracerr::wrap!())
    }

    /// Parses the provided role ID into a Discord [`RoleId`].
    fn role_id(id: &role::Id) -> Result<RoleId, Traced<chat::Error>> {
        let raw: &str = id.as_ref();
        raw.parse::<NonZeroU64>()
            .map(RoleId::from)
            .map_err(|e| {
                chat::Error::new(format!("invalid role ID `{id}`: {e}"))
            })
            .map_err(tracerr::wrap!())
    }
}

impl Chat<Select<By<Option<Member>, member::Lookup>>> for Discord {
    type Ok = Option<Member>;
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Member>, member::Lookup>>,
    ) -> Result<Self::Ok, Self::Err> {
        let member::Lookup { id, freshness } = by.into_inner();
        let Some(user) = Self::user_id(&id) else {
            log::warn!("`{id}` is not a valid Discord user ID");
            return Ok(None);
        };

        let fetched = match freshness {
            Freshness::Fresh => self.http.get_member(self.guild, user).await,
            Freshness::Cached => {
                self.guild.member(self.http.as_ref(), user).await
            }
        };
        match fetched {
            Ok(m) => Ok(Some(Member {
                id,
                username: m.user.name.into(),
                nickname: m.nick.map(Into::into),
                roles: m.roles.iter().map(|r| r.to_string().into()).collect(),
            })),
            Err(serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)))
                if resp.status_code.as_u16() == 404 =>
            {
                if resp.error.code == UNKNOWN_GUILD {
                    log::error!("guild `{}` not found", self.guild);
                } else {
                    log::info!("Discord member `{id}` not found");
                }
                Ok(None)
            }
            Err(e) => Err(tracerr::new!(chat::Error::from(e))),
        }
    }
}

impl Chat<Update<member::NicknameChange>> for Discord {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Update(change): Update<member::NicknameChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let member::NicknameChange { member, nickname } = change;
        let user = Self::target(&member)?;

        // Empty nickname makes Discord reset it.
        let nickname = nickname.map(String::from).unwrap_or_default();
        let edit = EditMember::new().nickname(nickname);
        self.guild
            .edit_member(self.http.as_ref(), user, edit)
            .await
            .map(drop)
            .map_err(chat::Error::from)
            .map_err(tracerr::wrap!())
    }
}

impl Chat<Insert<member::Assignment>> for Discord {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<member::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let member::Assignment {
            member,
            role,
            group,
        } = assignment;
        let user = Self::target(&member)?;
        let role = Self::role_id(&role)?;

        let reason = format!("Member of the `{group}` directory group");
        self.http
            .add_member_role(self.guild, user, role, Some(&reason))
            .await
            .map_err(chat::Error::from)
            .map_err(tracerr::wrap!())
    }
}

impl Chat<Delete<member::Assignment>> for Discord {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Delete(assignment): Delete<member::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let member::Assignment {
            member,
            role,
            group,
        } = assignment;
        let user = Self::target(&member)?;
        let role = Self::role_id(&role)?;

        let reason = format!("Not a member of the `{group}` directory group");
        self.http
            .remove_member_role(self.guild, user, role, Some(&reason))
            .await
            .map_err(chat::Error::from)
            .map_err(tracerr::wrap!())
    }
}

impl Chat<Publish<Notification>> for Discord {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Publish(notification): Publish<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        self.channel
            .say(self.http.as_ref(), String::from(notification))
            .await
            .map(drop)
            .map_err(chat::Error::from)
            .map_err(tracerr::wrap!())
    }
}

impl From<serenity::Error> for chat::Error {
    fn from(e: serenity::Error) -> Self {
        let status = if let serenity::Error::Http(e) = &e {
            e.status_code().map(|s| s.as_u16())
        } else {
            None
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}
