pub mod error;
pub mod models;

pub use error::SplitpotError;
pub use models::{Group, Id, NamedGroup, PartialTransaction, Split, SplitType, Transaction, User};

#[cfg(test)]
mod tests;
