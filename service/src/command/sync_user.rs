//! [`Command`] for synchronizing a single directory [`User`] with the chat
//! guild.

use std::{convert::Infallible, fmt};

use common::operations::{By, Publish, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{
        reconcile_nickname, reconcile_roles, ReconcileNickname,
        ReconcileRoles,
    },
    domain::{member, role, user, Notification, User},
    infra::{chat, directory, Chat, Directory},
    Service,
};

use super::Command;

/// [`Command`] for synchronizing a single directory [`User`] with the chat
/// guild: resolving its chat identity, then reconciling its nickname and its
/// roles.
///
/// Never fails: any failure is logged and announced via a [`Notification`],
/// so that a single [`User`] never blocks the rest of a sweep.
#[derive(Clone, Debug)]
pub struct SyncUser(pub User);

/// Outcome of a [`SyncUser`] [`Command`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// [`User`] has no verified chat identity and has been skipped.
    Unlinked,

    /// [`User`] has been synchronized.
    Synced {
        /// [`member::Username`] of the member which nickname was updated.
        nickname: Option<member::Username>,

        /// Applied [`role::Change`]s.
        roles: Vec<role::Change>,
    },
}

impl<Dir, Gw> Command<SyncUser> for Service<Dir, Gw>
where
    Self: Command<
            ReconcileNickname,
            Ok = Option<member::Username>,
            Err = Traced<reconcile_nickname::ExecutionError>,
        > + Command<
            ReconcileRoles,
            Ok = Vec<role::Change>,
            Err = Traced<reconcile_roles::ExecutionError>,
        >,
    Dir: Directory<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<directory::Error>,
    >,
    Gw: Chat<Publish<Notification>, Ok = (), Err = Traced<chat::Error>>,
{
    type Ok = Outcome;
    type Err = Infallible;

    async fn execute(&self, cmd: SyncUser) -> Result<Self::Ok, Self::Err> {
        let SyncUser(user) = cmd;
        let kind = &self.config().integration;

        let Some(identity) = user.chat_identity(kind) else {
            log::info!(
                "skipping directory user `{}`: {kind} is not linked",
                user.id,
            );
            return Ok(Outcome::Unlinked);
        };

        let nickname = match self
            .execute(ReconcileNickname {
                member: identity.member.clone(),
                username: user.username.clone(),
            })
            .await
        {
            Ok(Some(username)) => {
                self.notify(Notification::nickname_updated(
                    &username,
                    &identity.member,
                    &user.username,
                ))
                .await;
                Some(username)
            }
            Ok(None) => None,
            Err(e) => {
                self.report(user.id, &e).await;
                None
            }
        };

        let source = if self.config().fetch_details {
            match self
                .directory()
                .execute(Select(By::<Option<User>, _>::new(user.id)))
                .await
            {
                Ok(Some(details)) => details,
                Ok(None) => {
                    log::info!(
                        "skipping roles of directory user `{}`: user does not \
                         exist",
                        user.id,
                    );
                    return Ok(Outcome::Synced {
                        nickname,
                        roles: Vec::new(),
                    });
                }
                Err(e) => {
                    self.report(user.id, &e).await;
                    return Ok(Outcome::Synced {
                        nickname,
                        roles: Vec::new(),
                    });
                }
            }
        } else {
            user
        };

        let Some(identity) = source.chat_identity(kind) else {
            log::info!(
                "skipping roles of directory user `{}`: {kind} is not linked",
                source.id,
            );
            return Ok(Outcome::Synced {
                nickname,
                roles: Vec::new(),
            });
        };

        let roles = self
            .execute(ReconcileRoles {
                member: identity.member,
                groups: source.group_names(),
            })
            .await;
        let roles = match roles {
            Ok(changes) => changes,
            Err(e) => {
                self.report(source.id, &e).await;
                Vec::new()
            }
        };

        Ok(Outcome::Synced { nickname, roles })
    }
}

impl<Dir, Gw> Service<Dir, Gw>
where
    Gw: Chat<Publish<Notification>, Ok = (), Err = Traced<chat::Error>>,
{
    /// Logs and announces a failure to synchronize the [`User`] with the
    /// provided [`user::Id`].
    async fn report(&self, user: user::Id, error: &impl fmt::Display) {
        log::error!("failed to sync directory user `{user}`: {error}");
        self.notify(Notification::user_failed(user, error)).await;
    }
}
