use serde::Serialize;
use thiserror::Error;

/// Errors raised by the ledger core.
///
/// Validation errors are caller-correctable; the membership and user-mismatch
/// variants signal broken invariants in how the caller wired its entities.
/// Absence (e.g. a transaction lookup miss) is expressed as `Option`, never
/// through this enum.
#[derive(Error, Debug, Serialize)]
pub enum SplitpotError {
    /// Percentage split parameters must total exactly 100
    #[error("Percentage shares total {0}, must total 100")]
    InvalidPercentageTotal(i64),

    /// Split policy tag is not one of the five known tags
    #[error("Unknown split type `{0}`")]
    UnknownSplitType(String),

    /// A split was asked to allocate over zero withdrawers
    #[error("Split has no withdrawers to allocate over")]
    NoWithdrawers,

    /// A transaction needs at least one deposit
    #[error("Transaction deposits must not be empty")]
    EmptyDeposits,

    /// Rehydrating a transaction requires pre-computed withdrawals
    #[error("Either a split or (split_type and withdrawals) is required")]
    MissingSplit,

    /// Two ledger entries for different users cannot be combined
    #[error("User mismatch combining ledger entries: {0} vs {1}")]
    UserMismatch(String, String),

    /// Transaction references a user outside the group's membership
    #[error("User {0} is not a group member")]
    UserNotInGroup(String),
}
