mod group_tests;

use crate::models::{PartialTransaction, User};

pub fn test_user(name: &str) -> User {
    User::new(name, format!("{}@example.com", name.to_lowercase()))
}

pub fn deposit(user: &User, amount: i64) -> PartialTransaction {
    PartialTransaction::new(user.clone(), amount)
}
