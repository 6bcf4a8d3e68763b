pub mod group;
pub mod id;
pub mod split;
pub mod transaction;
pub mod user;

pub use group::{Group, NamedGroup};
pub use id::Id;
pub use split::{Split, SplitType};
pub use transaction::{PartialTransaction, Transaction};
pub use user::User;
