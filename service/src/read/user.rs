//! [`User`] read model definition.
//!
//! [`User`]: crate::domain::User

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use derive_more::{Display, From, Into};

/// Total count of directory [`User`]s.
///
/// [`User`]: crate::domain::User
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Into, PartialEq,
)]
pub struct TotalCount(usize);

/// Shared handle to the last completely counted [`TotalCount`].
///
/// Every completed sweep overwrites the value, so concurrent writers resolve
/// as last-writer-wins.
#[derive(Clone, Debug, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    /// Returns the last stored [`TotalCount`].
    #[must_use]
    pub fn get(&self) -> TotalCount {
        self.0.load(Ordering::Acquire).into()
    }

    /// Overwrites the stored [`TotalCount`].
    pub fn set(&self, count: TotalCount) {
        self.0.store(count.into(), Ordering::Release);
    }
}
