//! [`Query`] definition.

pub mod total_users;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;

pub use self::total_users::TotalUsers;
