use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transaction::PartialTransaction;
use super::user::User;
use crate::error::SplitpotError;

/// The five allocation policies a deposit can be split under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Equal,
    Unequal,
    ByShare,
    ByPercentage,
    ByAdjustment,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
            SplitType::Unequal => "unequal",
            SplitType::ByShare => "by_share",
            SplitType::ByPercentage => "by_percentage",
            SplitType::ByAdjustment => "by_adjustment",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = SplitpotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(SplitType::Equal),
            "unequal" => Ok(SplitType::Unequal),
            "by_share" => Ok(SplitType::ByShare),
            "by_percentage" => Ok(SplitType::ByPercentage),
            "by_adjustment" => Ok(SplitType::ByAdjustment),
            other => Err(SplitpotError::UnknownSplitType(other.to_string())),
        }
    }
}

/// Allocation engine: turns a lump of deposits into per-user withdrawals.
///
/// `split_parameters` is an insertion-ordered user → integer association whose
/// meaning depends on the policy: the explicit amount for [`SplitType::Unequal`],
/// a share weight for [`SplitType::ByShare`], a percentage for
/// [`SplitType::ByPercentage`], an adjustment delta for
/// [`SplitType::ByAdjustment`], and an optional withdrawer override (values
/// ignored) for [`SplitType::Equal`].
///
/// All policy parameters are validated at construction; [`Split::compute_split`]
/// itself cannot fail. The type serializes for outbound consumers but is
/// deliberately not deserializable: the only way to obtain a `Split` is
/// through the validating [`Split::new`] constructor.
#[derive(Clone, Debug, Serialize)]
pub struct Split {
    split_type: SplitType,
    split_parameters: Vec<(User, i64)>,
    deposits: Vec<PartialTransaction>,
}

impl Split {
    /// Builds the engine for `split_type`, rejecting parameter sets the policy
    /// cannot allocate over (percentages not totalling 100, no withdrawers).
    pub fn new(
        split_type: SplitType,
        split_parameters: Vec<(User, i64)>,
        deposits: Vec<PartialTransaction>,
    ) -> Result<Self, SplitpotError> {
        let split = Split {
            split_type,
            split_parameters,
            deposits,
        };
        split.validate()?;
        debug!(
            "Constructed {} split over {} deposits (total {})",
            split.split_type,
            split.deposits.len(),
            split.total()
        );
        Ok(split)
    }

    pub fn split_type(&self) -> SplitType {
        self.split_type
    }

    pub fn deposits(&self) -> &[PartialTransaction] {
        &self.deposits
    }

    /// Sum of the deposit amounts.
    pub fn total(&self) -> i64 {
        PartialTransaction::reduce(&self.deposits)
    }

    /// Produces the withdrawals for this split, one entry per withdrawer.
    ///
    /// Per-share rounding (half to even) can leave `sum(withdrawals)` a unit
    /// or two off `total()`; the residual is deliberately not reconciled.
    pub fn compute_split(&self) -> Vec<PartialTransaction> {
        match self.split_type {
            SplitType::Equal => {
                let withdrawers = self.equal_withdrawers();
                let share = self.total() as f64 / withdrawers.len() as f64;
                withdrawers
                    .into_iter()
                    .map(|user| PartialTransaction::new(user, round_half_to_even(share)))
                    .collect()
            }
            SplitType::Unequal => self
                .split_parameters
                .iter()
                .map(|(user, amount)| PartialTransaction::new(user.clone(), *amount))
                .collect(),
            SplitType::ByShare | SplitType::ByPercentage => {
                let total_shares: i64 = self.split_parameters.iter().map(|(_, s)| s).sum();
                let total = self.total();
                self.split_parameters
                    .iter()
                    .map(|(user, share)| {
                        let amount = *share as f64 / total_shares as f64 * total as f64;
                        PartialTransaction::new(user.clone(), round_half_to_even(amount))
                    })
                    .collect()
            }
            SplitType::ByAdjustment => {
                let adjustments: i64 = self.split_parameters.iter().map(|(_, a)| a).sum();
                let count = self.split_parameters.len() as f64;
                let equal_amount =
                    round_half_to_even((self.total() - adjustments) as f64 / count);
                self.split_parameters
                    .iter()
                    .map(|(user, adjustment)| {
                        PartialTransaction::new(user.clone(), equal_amount + adjustment)
                    })
                    .collect()
            }
        }
    }

    /// Withdrawers for an equal split: the parameter users when an override
    /// was given, otherwise the distinct deposit payers.
    fn equal_withdrawers(&self) -> Vec<User> {
        let mut withdrawers: Vec<User> = if self.split_parameters.is_empty() {
            self.deposits.iter().map(|d| d.user.clone()).collect()
        } else {
            self.split_parameters
                .iter()
                .map(|(user, _)| user.clone())
                .collect()
        };
        let mut seen = Vec::with_capacity(withdrawers.len());
        withdrawers.retain(|user| {
            if seen.contains(&user.user_id) {
                false
            } else {
                seen.push(user.user_id.clone());
                true
            }
        });
        withdrawers
    }

    fn validate(&self) -> Result<(), SplitpotError> {
        match self.split_type {
            SplitType::Equal => {
                if self.equal_withdrawers().is_empty() {
                    warn!("Equal split with no withdrawers");
                    return Err(SplitpotError::NoWithdrawers);
                }
            }
            SplitType::ByShare => {
                let total_shares: i64 = self.split_parameters.iter().map(|(_, s)| s).sum();
                if total_shares == 0 {
                    warn!("Share split with zero total share weight");
                    return Err(SplitpotError::NoWithdrawers);
                }
            }
            SplitType::ByPercentage => {
                let total: i64 = self.split_parameters.iter().map(|(_, p)| p).sum();
                if total != 100 {
                    warn!("Percentage split totalling {} instead of 100", total);
                    return Err(SplitpotError::InvalidPercentageTotal(total));
                }
            }
            SplitType::ByAdjustment => {
                if self.split_parameters.is_empty() {
                    warn!("Adjustment split with no participants");
                    return Err(SplitpotError::NoWithdrawers);
                }
            }
            SplitType::Unequal => {}
        }
        Ok(())
    }
}

/// Rounds to the nearest integer, ties to the even neighbour.
fn round_half_to_even(value: f64) -> i64 {
    let floor = value.floor();
    let fraction = value - floor;
    let floor = floor as i64;
    if fraction > 0.5 {
        floor + 1
    } else if fraction < 0.5 {
        floor
    } else if floor % 2 == 0 {
        floor
    } else {
        floor + 1
    }
}
