//! [`Notification`] definitions.

use derive_more::{AsRef, Display, Into};

use crate::domain::{member, role, user};

/// Human-readable message announcing a synchronization event in the
/// notification channel.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Notification(String);

impl Notification {
    /// Announces an updated [`member::Nickname`].
    #[must_use]
    pub fn nickname_updated(
        username: &member::Username,
        member: &member::Id,
        nickname: &user::Name,
    ) -> Self {
        Self(format!(
            "Updated nickname for Discord ID: {username} <@{member}> to \
             \"{nickname}\".",
        ))
    }

    /// Announces an applied [`role::Change`].
    #[must_use]
    pub fn role_changed(
        username: &member::Username,
        change: &role::Change,
    ) -> Self {
        let group = &change.group;
        Self(match change.action {
            role::Action::Added => {
                format!("Added role \"{group}\" to {username}")
            }
            role::Action::Removed => {
                format!("Removed role \"{group}\" from {username}")
            }
        })
    }

    /// Announces a failed directory sweep.
    #[must_use]
    pub fn sweep_failed(
        status: Option<u16>,
        message: impl Display,
    ) -> Self {
        Self(match status {
            Some(status) => format!("API Error: {status} {message}"),
            None => format!("API Error: {message}"),
        })
    }

    /// Announces a failed synchronization of a single [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[must_use]
    pub fn user_failed(user: user::Id, error: impl Display) -> Self {
        Self(format!("Error syncing user ID {user}: {error}"))
    }
}
