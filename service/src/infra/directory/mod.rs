//! [`Directory`]-related definitions.

#[cfg(feature = "http")]
pub mod http;

use std::fmt;

use derive_more::{AsRef, Display, Error as StdError, From, Into};

use crate::domain::User;

#[cfg(feature = "http")]
pub use self::http::Http;

/// Directory of users.
///
/// Implementations execute the following operations:
/// - `Select<By<Page, Option<Cursor>>>` fetches a [`Page`] of [`User`]s,
///   starting from the first one if no [`Cursor`] is provided;
/// - `Select<By<Option<User>, user::Id>>` fetches details of a single
///   [`User`], resolving to [`None`] if the [`User`] doesn't exist.
///
/// [`user::Id`]: crate::domain::user::Id
pub use common::Handler as Directory;

/// Opaque cursor pointing to a [`Page`] of the [`Directory`] listing.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Cursor(String);

/// Page of the [`Directory`] listing.
pub type Page = common::Page<Cursor, User>;

/// [`Directory`] transport error.
#[derive(Clone, Debug, Eq, PartialEq, StdError)]
pub struct Error {
    /// HTTP status code of the failed response, if any was received.
    pub status: Option<u16>,

    /// Description of the failure.
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => {
                let msg = &self.message;
                write!(f, "`Directory` responded with {status}: {msg}")
            }
            None => write!(f, "`Directory` request failed: {}", self.message),
        }
    }
}
