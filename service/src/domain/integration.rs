//! [`Integration`] definitions.

use derive_more::{AsRef, Display, From, Into};

/// Link between a directory user and an account on an external platform.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Integration {
    /// [`Kind`] of the external platform.
    pub kind: Kind,

    /// Identifier of the account on the external platform.
    pub identifier: String,

    /// Indicator whether the directory has verified this [`Integration`].
    pub verified: bool,
}

impl Integration {
    /// Indicates whether this [`Integration`] is a verified link to the
    /// provided platform.
    #[must_use]
    pub fn is_verified_for(&self, kind: &Kind) -> bool {
        self.verified && self.kind == *kind
    }
}

/// Tag of an external platform, as reported by the directory.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Kind(String);

impl Kind {
    /// Tag the directory uses for Discord accounts.
    pub const DISCORD: &'static str = "Discord";
}

impl Default for Kind {
    fn default() -> Self {
        Self(Self::DISCORD.to_owned())
    }
}
