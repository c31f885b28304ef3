//! Background environment for running long-living [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _,
};
use tokio::task::{JoinHandle, LocalSet};
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a failed [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment driving long-living [`Task`]s on the current
/// thread.
///
/// Resolves once every spawned [`Task`] completes, or as soon as any of them
/// fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are spawned onto.
    set: LocalSet,

    /// Named handles of the spawned [`Task`]s.
    handles: Vec<(&'static str, JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new named [`Task`] inside this [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning `{name}` background task");
        let handle = self.set.spawn_local(async move {
            future.await.map_err(|e| BoxError::from(Box::new(e)))
        });
        self.handles.push((name, handle));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), BoxError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let tasks = handles.into_iter().map(|(name, handle)| {
            handle
                .map(move |res| {
                    let res = res.map_err(BoxError::from).and_then(|r| r);
                    if let Err(e) = &res {
                        log::error!("`{name}` background task failed: {e}");
                    }
                    res
                })
                .boxed_local()
        });
        let tasks = future::try_join_all(tasks);
        async move { set.run_until(tasks).await.map(drop) }.boxed_local()
    }
}
