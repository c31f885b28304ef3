//! Bound of the process lifetime.

use std::{future::Future, time::Duration};

use tokio::time;

/// Drives the provided `run` future for at most the provided `lifetime`.
///
/// Returns [`None`] if the `lifetime` elapses first. A zero `lifetime` means
/// no bound at all.
pub async fn bounded<F>(run: F, lifetime: Duration) -> Option<F::Output>
where
    F: Future,
{
    if lifetime.is_zero() {
        return Some(run.await);
    }
    time::timeout(lifetime, run).await.ok()
}
