//! Service contains the directory to guild synchronization logic.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::{error::Error, sync::Arc};

use common::operations::{By, Publish, Start};
use tracerr::Traced;
use tracing as log;

#[cfg(test)]
use serde_json as _;

use crate::{
    domain::{integration, role, Notification},
    infra::{chat, Chat},
};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`integration::Kind`] identifying chat accounts in the directory.
    pub integration: integration::Kind,

    /// Mapping of directory groups to chat roles.
    pub roles: role::Mapping,

    /// Indicator whether user details should be fetched from the directory
    /// before reconciling roles, instead of relying on the listing.
    pub fetch_details: bool,

    /// [`task::Sweep`] configuration of the reconciling sweep.
    pub sweep: task::sweep::Config,

    /// [`task::Sweep`] configuration of the count-only refresh, if enabled.
    pub count_refresh: Option<task::sweep::Config>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Dir, Gw> {
    /// Configuration of this [`Service`].
    config: Arc<Config>,

    /// [`infra::Directory`] of this [`Service`].
    directory: Dir,

    /// [`Chat`] gateway of this [`Service`].
    chat: Gw,

    /// Total count of directory users, as of the last completed sweep.
    total_users: read::user::Counter,
}

impl<Dir, Gw> Service<Dir, Gw> {
    /// Creates a new [`Service`] with the provided parameters, along with the
    /// [`task::Background`] running its sweeps.
    pub fn new(
        config: Config,
        directory: Dir,
        chat: Gw,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<By<task::Sweep<Self>, task::sweep::Config>>,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Self {
            config: Arc::new(config),
            directory,
            chat,
            total_users: read::user::Counter::default(),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        let sweep = this.config.sweep;
        bg.spawn("sync sweep", async move {
            svc.execute(Start(By::new(sweep))).await
        });
        if let Some(refresh) = this.config.count_refresh {
            let svc = this.clone();
            bg.spawn("count refresh", async move {
                svc.execute(Start(By::new(refresh))).await
            });
        }

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`infra::Directory`] of this [`Service`].
    #[must_use]
    pub fn directory(&self) -> &Dir {
        &self.directory
    }

    /// Returns [`Chat`] gateway of this [`Service`].
    #[must_use]
    pub fn chat(&self) -> &Gw {
        &self.chat
    }

    /// Returns the shared [`read::user::Counter`] of this [`Service`].
    #[must_use]
    pub fn total_users(&self) -> &read::user::Counter {
        &self.total_users
    }
}

impl<Dir, Gw> Service<Dir, Gw>
where
    Gw: Chat<Publish<Notification>, Ok = (), Err = Traced<chat::Error>>,
{
    /// Publishes the provided [`Notification`] to the notification channel.
    ///
    /// Delivery failures are only logged.
    pub async fn notify(&self, notification: Notification) {
        _ = self
            .chat()
            .execute(Publish(notification))
            .await
            .map_err(|e| log::error!("failed to publish notification: {e}"));
    }
}

#[cfg(test)]
pub(crate) mod spec {
    //! Fixtures shared by the unit tests.

    use std::{sync::Arc, time::Duration};

    use crate::{
        domain::{integration, member, role, user, Member, User},
        infra::mock::Mock,
        read, task, Config, Service,
    };

    /// Creates a new [`Member`] of the chat guild.
    pub(crate) fn member(
        id: &str,
        username: &str,
        nickname: Option<&str>,
        roles: &[&str],
    ) -> Member {
        Member {
            id: id.into(),
            username: username.into(),
            nickname: nickname.map(member::Nickname::from),
            roles: roles.iter().copied().map(role::Id::from).collect(),
        }
    }

    /// Creates a new directory [`User`], optionally linked to the chat
    /// member with the provided ID.
    pub(crate) fn user(
        id: u64,
        username: &str,
        discord_id: Option<&str>,
        groups: &[&str],
    ) -> User {
        User {
            id: user::Id::from(id),
            username: username.into(),
            groups: groups.iter().copied().map(Into::into).collect(),
            integrations: Vec::new(),
            discord_id: discord_id.map(member::Id::from),
        }
    }

    /// Creates a new [`Service`] backed by the provided [`Mock`], fetching
    /// user details before reconciling roles.
    pub(crate) fn service(mock: &Mock, roles: &str) -> Service<Mock, Mock> {
        service_with(mock, roles, true)
    }

    /// Creates a new [`Service`] backed by the provided [`Mock`].
    pub(crate) fn service_with(
        mock: &Mock,
        roles: &str,
        fetch_details: bool,
    ) -> Service<Mock, Mock> {
        Service {
            config: Arc::new(Config {
                integration: integration::Kind::default(),
                roles: role::Mapping::parse(roles),
                fetch_details,
                sweep: task::sweep::Config {
                    interval: Duration::from_secs(60),
                    reconcile: true,
                },
                count_refresh: None,
            }),
            directory: mock.clone(),
            chat: mock.clone(),
            total_users: read::user::Counter::default(),
        }
    }
}
