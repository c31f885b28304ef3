//! Infrastructure layer.

pub mod chat;
pub mod directory;
#[cfg(test)]
pub(crate) mod mock;

pub use self::{chat::Chat, directory::Directory};
#[cfg(feature = "discord")]
pub use self::chat::{discord, Discord};
#[cfg(feature = "http")]
pub use self::directory::{http, Http};
