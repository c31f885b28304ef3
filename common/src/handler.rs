//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// Every seam of the synchronizer (commands, queries, tasks and
/// infrastructure backends) is a [`Handler`] of some operation `Args`, so the
/// business logic is written against trait bounds rather than concrete
/// clients.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
