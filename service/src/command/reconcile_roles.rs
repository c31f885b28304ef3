//! [`Command`] for reconciling chat roles with directory groups.

use std::collections::HashSet;

use common::operations::{By, Delete, Insert, Publish, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::role::Mapping;
use crate::{
    domain::{
        group,
        member::{self, Freshness},
        role, Member, Notification,
    },
    infra::{chat, Chat},
    Service,
};

use super::Command;

/// [`Command`] for reconciling roles of a [`Member`] with the directory
/// groups of its linked user, according to the configured [`Mapping`].
///
/// Resolves to the applied [`role::Change`]s, each of which is announced via
/// a [`Notification`] right after being applied.
#[derive(Clone, Debug)]
pub struct ReconcileRoles {
    /// ID of the [`Member`] which roles should be reconciled.
    pub member: member::Id,

    /// Names of the directory groups the linked user belongs to.
    pub groups: HashSet<group::Name>,
}

impl<Dir, Gw> Command<ReconcileRoles> for Service<Dir, Gw>
where
    Gw: Chat<
            Select<By<Option<Member>, member::Lookup>>,
            Ok = Option<Member>,
            Err = Traced<chat::Error>,
        > + Chat<Insert<member::Assignment>, Ok = (), Err = Traced<chat::Error>>
        + Chat<Delete<member::Assignment>, Ok = (), Err = Traced<chat::Error>>
        + Chat<Publish<Notification>, Ok = (), Err = Traced<chat::Error>>,
{
    type Ok = Vec<role::Change>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReconcileRoles,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReconcileRoles { member: id, groups } = cmd;

        let lookup = member::Lookup {
            id: id.clone(),
            freshness: Freshness::Cached,
        };
        let Some(member) = self
            .chat()
            .execute(Select(By::new(lookup)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            log::info!("Discord member `{id}` not found, roles are skipped");
            return Ok(Vec::new());
        };

        let changes = self.config().roles.changes(&groups, &member);
        for change in &changes {
            let assignment = member::Assignment {
                member: id.clone(),
                role: change.role.clone(),
                group: change.group.clone(),
            };
            match change.action {
                role::Action::Added => {
                    self.chat()
                        .execute(Insert(assignment))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))?;
                    log::info!(
                        "added role `{}` of group `{}` to `{}`",
                        change.role,
                        change.group,
                        member.username,
                    );
                }
                role::Action::Removed => {
                    self.chat()
                        .execute(Delete(assignment))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))?;
                    log::info!(
                        "removed role `{}` of group `{}` from `{}`",
                        change.role,
                        change.group,
                        member.username,
                    );
                }
            }
            self.notify(Notification::role_changed(&member.username, change))
                .await;
        }

        Ok(changes)
    }
}

/// Error of [`ReconcileRoles`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Chat`] error.
    #[display("`Chat` operation failed: {_0}")]
    Chat(chat::Error),
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use crate::{
        command::ReconcileRoles,
        domain::{group, member, role},
        infra::mock::Mock,
        spec::{member, service},
        Command as _,
    };

    fn cmd(id: &str, groups: &[&str]) -> ReconcileRoles {
        ReconcileRoles {
            member: id.into(),
            groups: groups
                .iter()
                .copied()
                .map(group::Name::from)
                .collect::<HashSet<_>>(),
        }
    }

    fn change(group: &str, role: &str, action: role::Action) -> role::Change {
        role::Change {
            group: group.into(),
            role: role.into(),
            action,
        }
    }

    #[tokio::test]
    async fn adds_missing_role() {
        let mock = Mock::default();
        _ = mock
            .state()
            .members
            .insert("1".into(), member("1", "steve_dc", None, &[]));
        let svc = service(&mock, "vip=R1");

        assert_eq!(
            svc.execute(cmd("1", &["vip"])).await.unwrap(),
            vec![change("vip", "R1", role::Action::Added)],
        );
        assert_eq!(
            mock.state().notifications,
            vec!["Added role \"vip\" to steve_dc".to_owned()],
        );
        assert!(mock.state().members[&member::Id::from("1")]
            .has_role(&"R1".into()));
    }

    #[tokio::test]
    async fn keeps_held_role() {
        let mock = Mock::default();
        _ = mock
            .state()
            .members
            .insert("1".into(), member("1", "steve_dc", None, &["R1"]));
        let svc = service(&mock, "vip=R1");

        assert!(svc.execute(cmd("1", &["vip"])).await.unwrap().is_empty());
        assert!(mock.state().role_changes.is_empty());
        assert!(mock.state().notifications.is_empty());
    }

    #[tokio::test]
    async fn removes_stale_role() {
        let mock = Mock::default();
        _ = mock
            .state()
            .members
            .insert("1".into(), member("1", "steve_dc", None, &["R1"]));
        let svc = service(&mock, "vip=R1");

        assert_eq!(
            svc.execute(cmd("1", &[])).await.unwrap(),
            vec![change("vip", "R1", role::Action::Removed)],
        );
        assert_eq!(
            mock.state().notifications,
            vec!["Removed role \"vip\" from steve_dc".to_owned()],
        );
    }

    #[tokio::test]
    async fn is_idempotent() {
        let mock = Mock::default();
        _ = mock
            .state()
            .members
            .insert("1".into(), member("1", "steve_dc", None, &["R2"]));
        let svc = service(&mock, "vip=R1,admin=R2");

        let first = svc.execute(cmd("1", &["vip"])).await.unwrap();
        let second = svc.execute(cmd("1", &["vip"])).await.unwrap();

        assert_eq!(
            first,
            vec![
                change("vip", "R1", role::Action::Added),
                change("admin", "R2", role::Action::Removed),
            ],
        );
        assert!(second.is_empty());
        assert_eq!(mock.state().role_changes.len(), 2);
    }

    #[tokio::test]
    async fn accepts_cached_member() {
        let mock = Mock::default();
        _ = mock
            .state()
            .members
            .insert("1".into(), member("1", "steve_dc", None, &[]));
        let svc = service(&mock, "vip=R1");

        _ = svc.execute(cmd("1", &[])).await.unwrap();

        assert_eq!(
            mock.state().lookups,
            vec![("1".into(), member::Freshness::Cached)],
        );
    }

    #[tokio::test]
    async fn skips_unknown_member() {
        let mock = Mock::default();
        let svc = service(&mock, "vip=R1");

        assert!(svc.execute(cmd("404", &["vip"])).await.unwrap().is_empty());
        assert!(mock.state().role_changes.is_empty());
    }
}
