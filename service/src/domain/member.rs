//! Chat [`Member`] definitions.

use std::collections::HashSet;

use derive_more::{AsRef, Display, From, Into};

use crate::domain::{group, role};

/// Member of the chat guild, as observed at the moment of fetching.
///
/// The chat platform owns this state, so a [`Member`] is never cached
/// between sweeps.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Member {
    /// ID of this [`Member`].
    pub id: Id,

    /// Stable account [`Username`] of this [`Member`].
    pub username: Username,

    /// Guild-specific [`Nickname`] of this [`Member`], if set.
    pub nickname: Option<Nickname>,

    /// Roles currently granted to this [`Member`].
    pub roles: HashSet<role::Id>,
}

impl Member {
    /// Indicates whether the [`Nickname`] of this [`Member`] is exactly the
    /// provided `name`.
    ///
    /// A missing or empty [`Nickname`] never matches.
    #[must_use]
    pub fn nickname_matches(&self, name: impl AsRef<str>) -> bool {
        self.nickname.as_ref().is_some_and(|nick| {
            let nick: &str = nick.as_ref();
            !nick.is_empty() && nick == name.as_ref()
        })
    }

    /// Indicates whether this [`Member`] has the provided role granted.
    #[must_use]
    pub fn has_role(&self, role: &role::Id) -> bool {
        self.roles.contains(role)
    }
}

/// ID of a [`Member`] on the chat platform.
///
/// Opaque for the domain: only the chat infrastructure interprets it.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Id(String);

/// Stable account name of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Username(String);

/// Guild-specific display name of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Nickname(String);

/// Way of looking up a [`Member`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lookup {
    /// ID of the [`Member`] to look up.
    pub id: Id,

    /// Required [`Freshness`] of the looked up state.
    pub freshness: Freshness,
}

/// Freshness of the [`Member`] state to look up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Freshness {
    /// Locally cached state is acceptable.
    Cached,

    /// State must be fetched from the chat platform, bypassing any cache.
    Fresh,
}

/// Change of a [`Member`]'s [`Nickname`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NicknameChange {
    /// ID of the [`Member`] to change the [`Nickname`] of.
    pub member: Id,

    /// New [`Nickname`], or [`None`] to clear it.
    pub nickname: Option<Nickname>,
}

/// Grant of a role to a [`Member`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    /// ID of the [`Member`] the role is granted to.
    pub member: Id,

    /// ID of the granted role.
    pub role: role::Id,

    /// Directory group the role mirrors.
    pub group: group::Name,
}
