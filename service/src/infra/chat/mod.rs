//! [`Chat`]-related definitions.

#[cfg(feature = "discord")]
pub mod discord;

use std::fmt;

use derive_more::Error as StdError;

#[cfg(feature = "discord")]
pub use self::discord::Discord;

/// Chat platform gateway.
///
/// Implementations execute the following operations:
/// - `Select<By<Option<Member>, member::Lookup>>` fetches a guild [`Member`],
///   resolving to [`None`] if there is no such [`Member`];
/// - `Update<member::NicknameChange>` sets or clears a [`Member`]'s nickname;
/// - `Insert<member::Assignment>` grants a role to a [`Member`];
/// - `Delete<member::Assignment>` revokes a role from a [`Member`];
/// - `Publish<Notification>` posts a [`Notification`] to the notification
///   channel.
///
/// [`Member`]: crate::domain::Member
/// [`Notification`]: crate::domain::Notification
/// [`member::Lookup`]: crate::domain::member::Lookup
/// [`member::NicknameChange`]: crate::domain::member::NicknameChange
/// [`member::Assignment`]: crate::domain::member::Assignment
pub use common::Handler as Chat;

/// [`Chat`] transport error.
#[derive(Clone, Debug, Eq, PartialEq, StdError)]
pub struct Error {
    /// HTTP status code of the failed response, if any was received.
    pub status: Option<u16>,

    /// Description of the failure.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] without a status code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => {
                write!(f, "`Chat` responded with {status}: {}", self.message)
            }
            None => write!(f, "`Chat` request failed: {}", self.message),
        }
    }
}
