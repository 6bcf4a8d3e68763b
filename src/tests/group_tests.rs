use crate::models::{Group, NamedGroup, Split, SplitType, Transaction};
use crate::tests::{deposit, test_user};
use crate::{Id, SplitpotError};

#[test]
fn add_transaction_checks_membership_over_both_sides() {
    let _ = env_logger::try_init();
    let mut alice = test_user("Alice");
    let mut bob = test_user("Bob");
    let outsider = test_user("Mallory");
    let mut group = Group::with_members(std::slice::from_mut(&mut alice));
    group.add_user_with_backreference(&mut bob);

    // Depositor is a member, one withdrawer is not.
    let split = Split::new(
        SplitType::Unequal,
        vec![(bob.clone(), 50), (outsider.clone(), 50)],
        vec![deposit(&alice, 100)],
    )
    .unwrap();
    let transaction = Transaction::new(vec![deposit(&alice, 100)], &split).unwrap();

    let result = group.add_transaction(transaction);
    assert!(matches!(
        result,
        Err(SplitpotError::UserNotInGroup(id)) if id == outsider.user_id.to_string()
    ));
    // Rejection leaves the group untouched.
    assert!(group.transactions().is_empty());
    assert_eq!(group.balance_for(&alice), 0);
}

#[test]
fn balance_is_deposits_minus_withdrawals() {
    let _ = env_logger::try_init();
    let mut members = vec![test_user("Alice"), test_user("Bob")];
    let mut group = Group::with_members(&mut members);
    let (alice, bob) = (members[0].clone(), members[1].clone());

    let split = Split::new(
        SplitType::Equal,
        vec![(alice.clone(), 0), (bob.clone(), 0)],
        vec![deposit(&alice, 420)],
    )
    .unwrap();
    let transaction = Transaction::new(vec![deposit(&alice, 420)], &split).unwrap();
    group.add_transaction(transaction).unwrap();

    assert_eq!(group.balance_for(&alice), 420 - 210);
    assert_eq!(group.balance_for(&bob), -210);

    let deposited: i64 = group.deposits_by(&alice).iter().map(|e| e.amount).sum();
    let withdrawn: i64 = group.withdrawals_by(&alice).iter().map(|e| e.amount).sum();
    assert_eq!(group.balance_for(&alice), deposited - withdrawn);
}

#[test]
fn balances_conserve_the_ledger_total() {
    let _ = env_logger::try_init();
    let mut members = vec![test_user("Alice"), test_user("Bob"), test_user("Carol")];
    let mut group = Group::with_members(&mut members);
    let (alice, bob, carol) = (members[0].clone(), members[1].clone(), members[2].clone());

    let dinner = Split::new(
        SplitType::ByShare,
        vec![(alice.clone(), 4), (bob.clone(), 6)],
        vec![deposit(&alice, 100)],
    )
    .unwrap();
    group
        .add_transaction(Transaction::new(vec![deposit(&alice, 100)], &dinner).unwrap())
        .unwrap();

    let cab = Split::new(
        SplitType::Unequal,
        vec![(bob.clone(), 20), (carol.clone(), 40)],
        vec![deposit(&carol, 60)],
    )
    .unwrap();
    group
        .add_transaction(Transaction::new(vec![deposit(&carol, 60)], &cab).unwrap())
        .unwrap();

    let total_deposits: i64 = group
        .transactions()
        .iter()
        .flat_map(|t| t.deposits())
        .map(|e| e.amount)
        .sum();
    let total_withdrawals: i64 = group
        .transactions()
        .iter()
        .flat_map(|t| t.withdrawals())
        .map(|e| e.amount)
        .sum();

    let balances = group.balances();
    assert_eq!(balances.len(), 3);
    let net: i64 = balances.values().sum();
    assert_eq!(net, total_deposits - total_withdrawals);
}

#[test]
fn balance_queries_are_idempotent() {
    let _ = env_logger::try_init();
    let mut members = vec![test_user("Alice"), test_user("Bob")];
    let mut group = Group::with_members(&mut members);
    let (alice, bob) = (members[0].clone(), members[1].clone());

    let split = Split::new(
        SplitType::ByAdjustment,
        vec![(alice.clone(), 0), (bob.clone(), 100)],
        vec![deposit(&alice, 200)],
    )
    .unwrap();
    group
        .add_transaction(Transaction::new(vec![deposit(&alice, 200)], &split).unwrap())
        .unwrap();

    let first = group.balance_for(&alice);
    assert_eq!(first, group.balance_for(&alice));
    assert_eq!(group.balances(), group.balances());
    assert_eq!(first, 150);
}

#[test]
fn transaction_lookup_miss_is_none() {
    let _ = env_logger::try_init();
    let mut members = vec![test_user("Alice")];
    let mut group = Group::with_members(&mut members);
    let alice = members[0].clone();

    let split = Split::new(SplitType::Equal, Vec::new(), vec![deposit(&alice, 50)]).unwrap();
    let transaction = Transaction::new(vec![deposit(&alice, 50)], &split).unwrap();
    let id = transaction.transaction_id().clone();
    group.add_transaction(transaction).unwrap();

    assert!(group.transaction(&id).is_some());
    assert!(group.transaction(&Id::from("no-such-transaction")).is_none());
}

#[test]
fn named_group_is_a_group_with_a_label() {
    let _ = env_logger::try_init();
    let mut alice = test_user("Alice");
    let mut group = NamedGroup::new("Ski trip", Some("Chalet week 7".to_string()));
    group.add_user_with_backreference(&mut alice);

    assert_eq!(group.name, "Ski trip");
    assert!(group.is_member(&alice));
    assert!(alice.is_member_of(&group));
    assert_eq!(group.balance_for(&alice), 0);
}

#[test]
fn membership_copies_of_the_same_user_are_interchangeable() {
    let _ = env_logger::try_init();
    let mut alice = test_user("Alice");
    let mut group = Group::with_members(std::slice::from_mut(&mut alice));

    // A rehydrated copy with the same id but different display fields.
    let alice_copy = crate::User::with_id(alice.user_id.clone(), "A.", "a@example.com");

    let split = Split::new(SplitType::Equal, Vec::new(), vec![deposit(&alice_copy, 80)]).unwrap();
    group
        .add_transaction(Transaction::new(vec![deposit(&alice_copy, 80)], &split).unwrap())
        .unwrap();

    assert_eq!(group.balance_for(&alice), 0); // deposited 80, owes 80
    assert_eq!(group.deposits_by(&alice).len(), 1);
}
