use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use super::id::Id;
use super::transaction::{PartialTransaction, Transaction};
use super::user::User;
use crate::error::SplitpotError;

/// A shared pot: a membership set of users and the transactions they share.
///
/// Membership holds value copies of [`User`] (equality is by id, so copies of
/// the same logical user are interchangeable); transactions are owned by the
/// group they were added to. The membership check in
/// [`Group::add_transaction`] is the single integrity gate of the model.
/// Serialize-only, like [`Transaction`]: rehydration rebuilds the group
/// through the constructors so the gate cannot be bypassed.
#[derive(Clone, Debug, Serialize)]
pub struct Group {
    pub group_id: Id,
    users: Vec<User>,
    transactions: Vec<Transaction>,
}

impl Group {
    /// Creates an empty group with a fresh id.
    pub fn new() -> Self {
        Self::with_id(Id::generate())
    }

    /// Rehydration constructor for callers that already hold a persisted id.
    pub fn with_id(group_id: Id) -> Self {
        Group {
            group_id,
            users: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Creates a group and wires membership both ways for the initial users.
    pub fn with_members(members: &mut [User]) -> Self {
        let mut group = Group::new();
        for user in members {
            user.add_group_with_backreference(&mut group);
        }
        group
    }

    /// Appends `user` to the membership; no side effect on the user.
    pub fn add_user(&mut self, user: &User) {
        self.users.push(user.clone());
    }

    /// Wires both sides of the membership relation in one call.
    pub fn add_user_with_backreference(&mut self, user: &mut User) {
        self.add_user(user);
        user.add_group(self);
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_member(&self, user: &User) -> bool {
        self.users.contains(user)
    }

    /// Appends a transaction after checking that every user it references,
    /// on the deposit and withdrawal side alike, is a group member. On
    /// rejection the group is left untouched.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), SplitpotError> {
        if let Some(outsider) = transaction.users().into_iter().find(|u| !self.is_member(u)) {
            warn!(
                "Rejecting transaction {} for group {}: user {} is not a member",
                transaction.transaction_id(),
                self.group_id,
                outsider.user_id
            );
            return Err(SplitpotError::UserNotInGroup(outsider.user_id.to_string()));
        }
        info!(
            "Adding transaction {} to group {}",
            transaction.transaction_id(),
            self.group_id
        );
        self.transactions.push(transaction);
        Ok(())
    }

    /// All deposit entries of `user` across this group's transactions, in
    /// transaction order.
    pub fn deposits_by(&self, user: &User) -> Vec<&PartialTransaction> {
        self.transactions
            .iter()
            .flat_map(|t| t.deposits())
            .filter(|entry| &entry.user == user)
            .collect()
    }

    /// All withdrawal entries of `user` across this group's transactions, in
    /// transaction order.
    pub fn withdrawals_by(&self, user: &User) -> Vec<&PartialTransaction> {
        self.transactions
            .iter()
            .flat_map(|t| t.withdrawals())
            .filter(|entry| &entry.user == user)
            .collect()
    }

    /// Net balance for `user` in this group: deposits minus withdrawals,
    /// 0 when the user has no entries.
    pub fn balance_for(&self, user: &User) -> i64 {
        let deposited: i64 = self.deposits_by(user).iter().map(|e| e.amount).sum();
        let withdrawn: i64 = self.withdrawals_by(user).iter().map(|e| e.amount).sum();
        deposited - withdrawn
    }

    /// Net balance for every member.
    pub fn balances(&self) -> HashMap<User, i64> {
        debug!("Computing balances for group {}", self.group_id);
        self.users
            .iter()
            .map(|user| (user.clone(), self.balance_for(user)))
            .collect()
    }

    /// Looks up a transaction by id; absence is not an error.
    pub fn transaction(&self, transaction_id: &Id) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.transaction_id() == transaction_id)
    }
}

impl Default for Group {
    fn default() -> Self {
        Group::new()
    }
}

/// A [`Group`] with a required display name and optional description.
/// Purely descriptive; all ledger behaviour lives on the inner group.
#[derive(Clone, Debug, Serialize)]
pub struct NamedGroup {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    group: Group,
}

impl NamedGroup {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        NamedGroup {
            name: name.into(),
            description,
            group: Group::new(),
        }
    }

    pub fn with_id(group_id: Id, name: impl Into<String>, description: Option<String>) -> Self {
        NamedGroup {
            name: name.into(),
            description,
            group: Group::with_id(group_id),
        }
    }
}

impl Deref for NamedGroup {
    type Target = Group;

    fn deref(&self) -> &Group {
        &self.group
    }
}

impl DerefMut for NamedGroup {
    fn deref_mut(&mut self) -> &mut Group {
        &mut self.group
    }
}
