//! Background [`Task`]s definitions.

mod background;
pub mod sweep;

pub use common::Handler as Task;

pub use self::{background::Background, sweep::Sweep};
