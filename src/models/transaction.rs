use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::id::Id;
use super::split::{Split, SplitType};
use super::user::User;
use crate::error::SplitpotError;

/// A single ledger entry: one user, one signed amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTransaction {
    pub user: User,
    pub amount: i64,
}

impl PartialTransaction {
    pub fn new(user: User, amount: i64) -> Self {
        PartialTransaction { user, amount }
    }

    /// Merges two entries for the same user into one with the summed amount.
    pub fn combine(&self, other: &PartialTransaction) -> Result<PartialTransaction, SplitpotError> {
        if self.user != other.user {
            return Err(SplitpotError::UserMismatch(
                self.user.user_id.to_string(),
                other.user.user_id.to_string(),
            ));
        }
        Ok(PartialTransaction::new(
            self.user.clone(),
            self.amount + other.amount,
        ))
    }

    /// Integer sum over a slice of entries.
    pub fn reduce(entries: &[PartialTransaction]) -> i64 {
        entries.iter().map(|entry| entry.amount).sum()
    }
}

/// An immutable bundle of deposits and the withdrawals they were split into,
/// tagged with the policy that produced them.
///
/// Serializes for outbound consumers; rehydration goes through
/// [`Transaction::from_parts`] so the non-empty deposit and withdrawal
/// checks always run.
#[derive(Clone, Debug, Serialize)]
pub struct Transaction {
    transaction_id: Id,
    split_type: SplitType,
    date: DateTime<Utc>,
    deposits: Vec<PartialTransaction>,
    withdrawals: Vec<PartialTransaction>,
}

impl Transaction {
    /// Builds a transaction whose withdrawals and policy tag are derived from
    /// a constructed [`Split`] engine. Fresh id, dated now.
    pub fn new(
        deposits: Vec<PartialTransaction>,
        split: &Split,
    ) -> Result<Transaction, SplitpotError> {
        if deposits.is_empty() {
            return Err(SplitpotError::EmptyDeposits);
        }
        let transaction = Transaction {
            transaction_id: Id::generate(),
            split_type: split.split_type(),
            date: Utc::now(),
            deposits,
            withdrawals: split.compute_split(),
        };
        debug!(
            "Transaction {} created via {} split",
            transaction.transaction_id, transaction.split_type
        );
        Ok(transaction)
    }

    /// Rehydration path for callers that already hold pre-computed
    /// withdrawals (e.g. a persistence layer reloading stored transactions).
    pub fn from_parts(
        transaction_id: Id,
        split_type: SplitType,
        date: DateTime<Utc>,
        deposits: Vec<PartialTransaction>,
        withdrawals: Vec<PartialTransaction>,
    ) -> Result<Transaction, SplitpotError> {
        if deposits.is_empty() {
            return Err(SplitpotError::EmptyDeposits);
        }
        if withdrawals.is_empty() {
            return Err(SplitpotError::MissingSplit);
        }
        Ok(Transaction {
            transaction_id,
            split_type,
            date,
            deposits,
            withdrawals,
        })
    }

    pub fn transaction_id(&self) -> &Id {
        &self.transaction_id
    }

    pub fn split_type(&self) -> SplitType {
        self.split_type
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn deposits(&self) -> &[PartialTransaction] {
        &self.deposits
    }

    pub fn withdrawals(&self) -> &[PartialTransaction] {
        &self.withdrawals
    }

    /// Every user referenced by this transaction, deposits and withdrawals
    /// alike, deduplicated.
    pub fn users(&self) -> HashSet<&User> {
        self.deposits
            .iter()
            .chain(self.withdrawals.iter())
            .map(|entry| &entry.user)
            .collect()
    }
}
