//! [`User`] definitions.

use std::collections::HashSet;

use derive_more::{AsRef, Display, From, FromStr, Into};

use crate::domain::{group, integration, member, Integration};

/// User registered in the directory.
///
/// A [`User`] is a snapshot of a single directory response and is never
/// persisted: every sweep fetches it anew.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Name`] of this [`User`].
    pub username: Name,

    /// Names of the groups this [`User`] belongs to, in directory order.
    pub groups: Vec<group::Name>,

    /// [`Integration`]s linked to this [`User`].
    pub integrations: Vec<Integration>,

    /// Chat member ID recorded directly on this [`User`], if any.
    pub discord_id: Option<member::Id>,
}

impl User {
    /// Resolves the chat [`Identity`] of this [`User`].
    ///
    /// The directly recorded [`member::Id`] takes precedence. Otherwise, the
    /// first verified [`Integration`] of the provided platform [`Kind`] is
    /// used. Returns [`None`] if this [`User`] isn't linked to the chat
    /// platform, which is an expected outcome rather than a failure.
    ///
    /// [`Kind`]: integration::Kind
    #[must_use]
    pub fn chat_identity(&self, kind: &integration::Kind) -> Option<Identity> {
        self.discord_id
            .clone()
            .filter(|id| !AsRef::<str>::as_ref(id).is_empty())
            .or_else(|| {
                self.integrations
                    .iter()
                    .find(|i| i.is_verified_for(kind))
                    .map(|i| member::Id::from(i.identifier.clone()))
                    .filter(|id| !AsRef::<str>::as_ref(id).is_empty())
            })
            .map(|member| Identity {
                user: self.id,
                member,
            })
    }

    /// Returns the set of group names this [`User`] belongs to.
    #[must_use]
    pub fn group_names(&self) -> HashSet<group::Name> {
        self.groups.iter().cloned().collect()
    }
}

/// ID of a [`User`] in the directory.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Id(u64);

/// Username of a [`User`] in the directory.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Name(String);

/// Verified link between a [`User`] and a chat [`Member`].
///
/// [`Member`]: crate::domain::Member
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    /// ID of the directory [`User`].
    pub user: Id,

    /// ID of the linked chat member.
    pub member: member::Id,
}
