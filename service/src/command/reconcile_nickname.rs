//! [`Command`] for reconciling a [`member::Nickname`] with a directory
//! [`user::Name`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        member::{self, Freshness},
        user, Member,
    },
    infra::{chat, Chat},
    Service,
};

use super::Command;

/// [`Command`] for reconciling a [`member::Nickname`] with a directory
/// [`user::Name`].
///
/// Resolves to the [`member::Username`] of the updated [`Member`], or to
/// [`None`] if no update was needed.
#[derive(Clone, Debug)]
pub struct ReconcileNickname {
    /// ID of the [`Member`] which [`member::Nickname`] should be reconciled.
    pub member: member::Id,

    /// Directory [`user::Name`] the [`member::Nickname`] should be equal to.
    pub username: user::Name,
}

impl<Dir, Gw> Command<ReconcileNickname> for Service<Dir, Gw>
where
    Gw: Chat<
            Select<By<Option<Member>, member::Lookup>>,
            Ok = Option<Member>,
            Err = Traced<chat::Error>,
        > + Chat<
            Update<member::NicknameChange>,
            Ok = (),
            Err = Traced<chat::Error>,
        >,
{
    type Ok = Option<member::Username>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReconcileNickname,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReconcileNickname {
            member: id,
            username,
        } = cmd;

        let lookup = member::Lookup {
            id: id.clone(),
            freshness: Freshness::Fresh,
        };
        let Some(member) = self
            .chat()
            .execute(Select(By::new(lookup)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            log::info!("Discord member `{id}` not found, nickname is skipped");
            return Ok(None);
        };
        log::debug!(
            "checking Discord member `{id}`: username `{}`, nickname {:?}, \
             directory username `{username}`",
            member.username,
            member.nickname.as_ref().map(AsRef::<str>::as_ref),
        );

        if member.nickname_matches(&username) {
            log::debug!("nickname of `{id}` already matches `{username}`");
            return Ok(None);
        }

        // Always cleared before being set.
        self.chat()
            .execute(Update(member::NicknameChange {
                member: id.clone(),
                nickname: None,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        self.chat()
            .execute(Update(member::NicknameChange {
                member: id.clone(),
                nickname: Some(String::from(username.clone()).into()),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!("updated nickname of `{id}` to `{username}`");

        Ok(Some(member.username))
    }
}

/// Error of [`ReconcileNickname`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Chat`] error.
    #[display("`Chat` operation failed: {_0}")]
    Chat(chat::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::ReconcileNickname,
        domain::member,
        infra::mock::Mock,
        spec::{member, service},
        Command as _,
    };

    fn cmd(id: &str, username: &str) -> ReconcileNickname {
        ReconcileNickname {
            member: id.into(),
            username: username.into(),
        }
    }

    fn nicknames(mock: &Mock) -> Vec<Option<String>> {
        mock.state()
            .nickname_changes
            .iter()
            .map(|c| c.nickname.clone().map(String::from))
            .collect()
    }

    #[tokio::test]
    async fn keeps_matching_nickname() {
        let mock = Mock::default();
        _ = mock.state().members.insert(
            "1".into(),
            member("1", "steve_dc", Some("Steve"), &[]),
        );
        let svc = service(&mock, "");

        assert_eq!(svc.execute(cmd("1", "Steve")).await.unwrap(), None);
        assert!(mock.state().nickname_changes.is_empty());
    }

    #[tokio::test]
    async fn clears_then_sets_differing_nickname() {
        let mock = Mock::default();
        _ = mock.state().members.insert(
            "1".into(),
            member("1", "steve_dc", Some("steve"), &[]),
        );
        let svc = service(&mock, "");

        assert_eq!(
            svc.execute(cmd("1", "Steve")).await.unwrap(),
            Some(member::Username::from("steve_dc")),
        );
        assert_eq!(nicknames(&mock), vec![None, Some("Steve".into())]);
        assert_eq!(
            mock.state().members[&member::Id::from("1")]
                .nickname
                .clone()
                .map(String::from),
            Some("Steve".into()),
        );
    }

    #[tokio::test]
    async fn sets_missing_or_empty_nickname() {
        let mock = Mock::default();
        _ = mock
            .state()
            .members
            .insert("1".into(), member("1", "steve_dc", None, &[]));
        _ = mock
            .state()
            .members
            .insert("2".into(), member("2", "alex_dc", Some(""), &[]));
        let svc = service(&mock, "");

        assert!(svc.execute(cmd("1", "Steve")).await.unwrap().is_some());
        assert!(svc.execute(cmd("2", "Alex")).await.unwrap().is_some());
        assert_eq!(
            nicknames(&mock),
            vec![None, Some("Steve".into()), None, Some("Alex".into())],
        );
    }

    #[tokio::test]
    async fn bypasses_cache() {
        let mock = Mock::default();
        _ = mock.state().members.insert(
            "1".into(),
            member("1", "steve_dc", Some("Steve"), &[]),
        );
        let svc = service(&mock, "");

        _ = svc.execute(cmd("1", "Steve")).await.unwrap();

        assert_eq!(
            mock.state().lookups,
            vec![("1".into(), member::Freshness::Fresh)],
        );
    }

    #[tokio::test]
    async fn skips_unknown_member() {
        let mock = Mock::default();
        let svc = service(&mock, "");

        assert_eq!(svc.execute(cmd("404", "Steve")).await.unwrap(), None);
        assert!(mock.state().nickname_changes.is_empty());
    }

    #[tokio::test]
    async fn fails_on_chat_error() {
        let mock = Mock::default();
        _ = mock.state().broken.insert("1".into());
        let svc = service(&mock, "");

        assert!(svc.execute(cmd("1", "Steve")).await.is_err());
    }
}
