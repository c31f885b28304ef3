//! Chat role definitions.

use std::collections::HashSet;

use derive_more::{AsRef, Display, From, Into};

use crate::domain::{group, Member};

/// ID of a role on the chat platform.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Id(String);

/// Static mapping of directory groups to chat roles.
///
/// Parsed once at startup and never mutated afterwards. Entries keep the
/// order of their first appearance, while a repeated group overrides the
/// role of its earlier entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Mapping(Vec<(group::Name, Id)>);

impl Mapping {
    /// Parses a [`Mapping`] out of `group=roleId` pairs separated by commas.
    ///
    /// Whitespace around groups and roles is trimmed. Malformed pairs (no
    /// `=`, empty group or empty role) are silently skipped.
    #[must_use]
    pub fn parse(s: impl AsRef<str>) -> Self {
        let mut mapping = Self::default();
        for pair in s.as_ref().split(',') {
            let mut parts = pair.split('=');
            let (Some(group), Some(role)) = (parts.next(), parts.next()) else {
                continue;
            };
            let (group, role) = (group.trim(), role.trim());
            if group.is_empty() || role.is_empty() {
                continue;
            }
            mapping.insert(group.into(), role.into());
        }
        mapping
    }

    /// Maps the provided `group` to the provided `role`, overriding any
    /// previous mapping of the `group`.
    pub fn insert(&mut self, group: group::Name, role: Id) {
        let existing = self.0.iter_mut().find(|(g, _)| *g == group);
        if let Some((_, existing)) = existing {
            *existing = role;
        } else {
            self.0.push((group, role));
        }
    }

    /// Iterates over the mapped groups and their roles.
    pub fn iter(&self) -> impl Iterator<Item = (&group::Name, &Id)> {
        self.0.iter().map(|(g, r)| (g, r))
    }

    /// Number of mapped groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether no group is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Computes the [`Change`]s converging the roles of the provided
    /// [`Member`] to the provided directory `groups`.
    ///
    /// A mapped role is added when its group is present and the role is
    /// missing. It is removed when held while none of the present groups
    /// maps to it. Every role changes at most once, so groups sharing a role
    /// converge too. Converged state yields no [`Change`]s.
    #[must_use]
    pub fn changes(
        &self,
        groups: &HashSet<group::Name>,
        member: &Member,
    ) -> Vec<Change> {
        let desired = self
            .iter()
            .filter(|(g, _)| groups.contains(*g))
            .map(|(_, r)| r)
            .collect::<HashSet<_>>();

        let mut changed = HashSet::new();
        self.iter()
            .filter_map(|(group, role)| {
                let action = match (
                    desired.contains(role),
                    member.has_role(role),
                ) {
                    (true, false) if groups.contains(group) => Action::Added,
                    (false, true) => Action::Removed,
                    (true, _) | (false, false) => return None,
                };
                changed.insert(role).then(|| Change {
                    group: group.clone(),
                    role: role.clone(),
                    action,
                })
            })
            .collect()
    }
}

/// Change applied to a [`Member`]'s roles.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Change {
    /// Directory group the changed role mirrors.
    pub group: group::Name,

    /// ID of the changed role.
    pub role: Id,

    /// [`Action`] performed on the role.
    pub action: Action,
}

/// Action performed on a [`Member`]'s role.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Action {
    /// Role has been granted.
    #[display("Added")]
    Added,

    /// Role has been revoked.
    #[display("Removed")]
    Removed,
}
