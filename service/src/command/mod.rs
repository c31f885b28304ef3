//! [`Command`] definition.

pub mod reconcile_nickname;
pub mod reconcile_roles;
pub mod sync_user;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    reconcile_nickname::ReconcileNickname, reconcile_roles::ReconcileRoles,
    sync_user::SyncUser,
};
