//! [`Sweep`] [`Task`] walking the whole directory listing.

use std::{convert::Infallible, time::Duration};

use common::operations::{By, Perform, Publish, Select, Start};
use derive_more::{Display, Error as StdError, From};
use tokio::time;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{sync_user::Outcome, SyncUser},
    domain::Notification,
    infra::{
        chat,
        directory::{self, Cursor, Page},
        Chat, Directory,
    },
    read::user::TotalCount,
    Command, Service,
};

use super::Task;

/// Configuration of a [`Sweep`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Delay between the end of a sweep and the start of the next one.
    pub interval: Duration,

    /// Indicator whether every listed user should be synchronized, rather
    /// than only counted.
    pub reconcile: bool,
}

/// [`Task`] walking every page of the directory listing, counting the users
/// and, optionally, synchronizing each of them with the chat guild.
#[derive(Clone, Copy, Debug)]
pub struct Sweep<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Dir, Gw> Task<Start<By<Sweep<Self>, Config>>> for Service<Dir, Gw>
where
    Sweep<Self>: Task<
        Perform<()>,
        Ok = TotalCount,
        Err = Traced<ExecutionError>,
    >,
    Gw: Chat<Publish<Notification>, Ok = (), Err = Traced<chat::Error>>,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<Sweep<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = Sweep {
            config,
            service: self.clone(),
        };
        let kind = if config.reconcile { "sync" } else { "count" };

        loop {
            match task.execute(Perform(())).await {
                Ok(total) => {
                    self.total_users().set(total);
                    log::info!(
                        "directory {kind} sweep finished: {total} users",
                    );
                }
                Err(e) => {
                    log::error!("directory {kind} sweep failed: {e}");
                    if config.reconcile {
                        let ExecutionError::Directory(err) = e.as_ref();
                        self.notify(Notification::sweep_failed(
                            err.status,
                            &err.message,
                        ))
                        .await;
                    }
                }
            }
            time::sleep(config.interval).await;
        }
    }
}

impl<Dir, Gw> Task<Perform<()>> for Sweep<Service<Dir, Gw>>
where
    Dir: Directory<
        Select<By<Page, Option<Cursor>>>,
        Ok = Page,
        Err = Traced<directory::Error>,
    >,
    Service<Dir, Gw>: Command<SyncUser, Ok = Outcome, Err = Infallible>,
{
    type Ok = TotalCount;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut cursor = None;
        let (mut total, mut linked, mut pages) = (0_usize, 0_usize, 0_usize);
        loop {
            let page = self
                .service
                .directory()
                .execute(Select(By::<Page, _>::new(cursor.take())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            pages += 1;
            total += page.len();

            let (users, next) = page.into_parts();
            if users.is_empty() {
                break;
            }
            if self.config.reconcile {
                for user in users {
                    let outcome = self
                        .service
                        .execute(SyncUser(user))
                        .await
                        .unwrap_or_else(|e| match e {});
                    if outcome != Outcome::Unlinked {
                        linked += 1;
                    }
                }
            }

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        log::debug!(
            "walked {pages} directory pages: {total} users, {linked} linked",
        );
        Ok(total.into())
    }
}

/// Error of [`Sweep`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Directory`] error.
    #[display("`Directory` operation failed: {_0}")]
    Directory(directory::Error),
}
