//! In-memory [`Directory`] and [`Chat`] used in tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use common::operations::{By, Delete, Insert, Publish, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        member::{self, Freshness},
        role, user, Member, Notification, User,
    },
    infra::{
        chat,
        directory::{self, Cursor, Page},
        Chat, Directory,
    },
};

/// Shared in-memory state of the directory and the chat guild.
#[derive(Clone, Debug, Default)]
pub(crate) struct Mock(Arc<Mutex<State>>);

/// State of a [`Mock`].
#[derive(Debug, Default)]
pub(crate) struct State {
    /// Listing pages keyed by the cursor requesting them.
    pub(crate) pages: HashMap<Option<Cursor>, Result<Page, directory::Error>>,

    /// Cursors of the requested listing pages, in request order.
    pub(crate) page_requests: Vec<Option<Cursor>>,

    /// User details keyed by user ID.
    pub(crate) details: HashMap<user::Id, User>,

    /// Guild members keyed by member ID.
    pub(crate) members: HashMap<member::Id, Member>,

    /// Members whose every operation fails.
    pub(crate) broken: HashSet<member::Id>,

    /// Freshness of every member lookup, in lookup order.
    pub(crate) lookups: Vec<(member::Id, Freshness)>,

    /// Applied nickname changes, in application order.
    pub(crate) nickname_changes: Vec<member::NicknameChange>,

    /// Applied role changes, in application order.
    pub(crate) role_changes: Vec<(member::Assignment, role::Action)>,

    /// Published notifications, in publication order.
    pub(crate) notifications: Vec<String>,
}

impl Mock {
    /// Locks the [`State`] of this [`Mock`].
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    /// Fails the operation if the provided member is broken.
    fn check(&self, id: &member::Id) -> Result<(), Traced<chat::Error>> {
        if self.state().broken.contains(id) {
            return Err(tracerr::new!(chat::Error {
                status: Some(500),
                message: format!("member `{id}` is broken"),
            }));
        }
        Ok(())
    }
}

impl Directory<Select<By<Page, Option<Cursor>>>> for Mock {
    type Ok = Page;
    type Err = Traced<directory::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page, Option<Cursor>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let cursor = by.into_inner();
        let mut state = self.state();
        state.page_requests.push(cursor.clone());
        state
            .pages
            .get(&cursor)
            .cloned()
            .unwrap_or_else(|| {
                Err(directory::Error {
                    status: Some(404),
                    message: format!("no page at {cursor:?}"),
                })
            })
            .map_err(tracerr::wrap!())
    }
}

impl Directory<Select<By<Option<User>, user::Id>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<directory::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().details.get(by.as_inner()).cloned())
    }
}

impl Chat<Select<By<Option<Member>, member::Lookup>>> for Mock {
    type Ok = Option<Member>;
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Member>, member::Lookup>>,
    ) -> Result<Self::Ok, Self::Err> {
        let member::Lookup { id, freshness } = by.into_inner();
        self.check(&id)?;
        let mut state = self.state();
        state.lookups.push((id.clone(), freshness));
        Ok(state.members.get(&id).cloned())
    }
}

impl Chat<Update<member::NicknameChange>> for Mock {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Update(change): Update<member::NicknameChange>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check(&change.member)?;
        let mut state = self.state();
        if let Some(m) = state.members.get_mut(&change.member) {
            m.nickname.clone_from(&change.nickname);
        }
        state.nickname_changes.push(change);
        Ok(())
    }
}

impl Chat<Insert<member::Assignment>> for Mock {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<member::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check(&assignment.member)?;
        let mut state = self.state();
        if let Some(m) = state.members.get_mut(&assignment.member) {
            _ = m.roles.insert(assignment.role.clone());
        }
        state.role_changes.push((assignment, role::Action::Added));
        Ok(())
    }
}

impl Chat<Delete<member::Assignment>> for Mock {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Delete(assignment): Delete<member::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check(&assignment.member)?;
        let mut state = self.state();
        if let Some(m) = state.members.get_mut(&assignment.member) {
            _ = m.roles.remove(&assignment.role);
        }
        state.role_changes.push((assignment, role::Action::Removed));
        Ok(())
    }
}

impl Chat<Publish<Notification>> for Mock {
    type Ok = ();
    type Err = Traced<chat::Error>;

    async fn execute(
        &self,
        Publish(notification): Publish<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().notifications.push(notification.into());
        Ok(())
    }
}
