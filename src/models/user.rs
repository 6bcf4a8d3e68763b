use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::group::Group;
use super::id::Id;

/// A participant in shared pots.
///
/// Group membership is tracked as a non-owning list of group ids; the store
/// holding the entities resolves ids back to [`Group`] values when needed
/// (see [`User::balance`]). Equality and hashing are defined on `user_id`
/// only, so distinct in-memory copies of the same logical user compare equal
/// in ledger entries, membership checks and balance maps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub user_id: Id,
    pub name: String,
    pub email: String,
    pub groups: Vec<Id>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Id::generate(), name, email)
    }

    /// Rehydration constructor for callers that already hold a persisted id.
    pub fn with_id(user_id: Id, name: impl Into<String>, email: impl Into<String>) -> Self {
        User {
            user_id,
            name: name.into(),
            email: email.into(),
            groups: Vec::new(),
        }
    }

    /// Records membership of `group` on this user only.
    pub fn add_group(&mut self, group: &Group) {
        self.groups.push(group.group_id.clone());
    }

    /// Wires both sides of the membership relation in one call.
    pub fn add_group_with_backreference(&mut self, group: &mut Group) {
        self.add_group(group);
        group.add_user(self);
    }

    pub fn is_member_of(&self, group: &Group) -> bool {
        self.groups.contains(&group.group_id)
    }

    /// Net balance for this user summed over every group it belongs to.
    ///
    /// `groups` is the caller's candidate set (typically everything its store
    /// holds); groups this user is not a member of are skipped. Returns 0 for
    /// a user in no groups.
    pub fn balance<'a>(&self, groups: impl IntoIterator<Item = &'a Group>) -> i64 {
        groups
            .into_iter()
            .filter(|group| self.is_member_of(group))
            .map(|group| group.balance_for(self))
            .sum()
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_id.hash(state);
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {}: {}", self.user_id, self.name)
    }
}
