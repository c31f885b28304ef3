//! Domain definitions.

pub mod group;
pub mod integration;
pub mod member;
pub mod notification;
pub mod role;
pub mod user;

pub use self::{
    integration::Integration, member::Member, notification::Notification,
    user::User,
};
