// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendsmart::models::{
    Category, MAX_AMOUNT, NewFund, NewShare, NewTransaction, Transaction, TransactionType,
    ValidationError,
};
use spendsmart::state::{AppState, EditError};
use spendsmart::store::{self, Collection, FileStore, KeyValueStore, MemoryStore};
use tempfile::tempdir;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn draft(amount: &str, category: &str, date: (i32, u32, u32)) -> NewTransaction {
    NewTransaction {
        amount: Some(d(amount)),
        kind: TransactionType::Expense,
        category: Some(category.to_string()),
        note: Some("  ".to_string()),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
    }
}

#[test]
fn added_transactions_are_prepended_and_persisted() {
    let mut state = AppState::load(MemoryStore::new());
    let first = state.add_transaction(draft("10", "Fuel", (2024, 3, 1))).unwrap();
    let second = state.add_transaction(draft("20", "Parents", (2024, 3, 2))).unwrap();
    assert!(first.durable && second.durable);
    assert_ne!(first.value.id, second.value.id);
    assert_eq!(second.value.date, "2024-03-02T00:00:00.000Z");
    assert_eq!(second.value.category, Category::Parents);
    assert_eq!(second.value.note, None);

    let ids: Vec<&str> = state.transactions().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![second.value.id.as_str(), first.value.id.as_str()]);

    let persisted: Vec<Transaction> =
        store::load(state.store(), Collection::Transactions).unwrap();
    assert_eq!(persisted, state.transactions());
}

#[test]
fn invalid_input_never_reaches_the_store() {
    let mut state = AppState::load(MemoryStore::new());
    let mut missing_amount = draft("1", "Fuel", (2024, 1, 1));
    missing_amount.amount = None;
    let err = state.add_transaction(missing_amount).unwrap_err();
    assert!(matches!(err, EditError::Invalid(ValidationError::MissingAmount)));

    let err = state
        .add_transaction(draft("5", "   ", (2024, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, EditError::Invalid(ValidationError::MissingCategory)));

    let err = state
        .add_transaction(draft("-5", "Fuel", (2024, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, EditError::Invalid(ValidationError::Negative { .. })));

    let err = state
        .add_transaction(draft("50000000000000000000000000000", "Fuel", (2024, 1, 1)))
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::Invalid(ValidationError::TooLarge { field: "amount", .. })
    ));

    assert!(state.transactions().is_empty());
    let persisted: Vec<Transaction> =
        store::load(state.store(), Collection::Transactions).unwrap();
    assert!(persisted.is_empty());
}

#[test]
fn amounts_up_to_the_limit_are_accepted() {
    let mut state = AppState::load(MemoryStore::new());
    let limit = MAX_AMOUNT.to_string();
    assert_eq!(limit, "1000000000000");
    state.add_transaction(draft(&limit, "Salary", (2024, 1, 1))).unwrap();
    state.add_transaction(draft(&limit, "Salary", (2024, 1, 2))).unwrap();
    let err = state
        .add_share(NewShare {
            name: Some("Acme".into()),
            units: Some(d("2000000000000")),
            buy_price: Some(d("1")),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::Invalid(ValidationError::TooLarge { field: "units", .. })
    ));
}

#[test]
fn unreadable_record_does_not_wipe_the_collection() {
    let dir = tempdir().unwrap();
    let seeded = r#"[{"id":"1","amount":10,"type":"expense","category":"Fuel","note":"","date":"2024-03-01T00:00:00.000Z"},
        {"id":"2","amount":null,"type":"expense","category":"Fuel","note":"","date":"2024-03-02T00:00:00.000Z"}]"#;
    let mut fs = FileStore::open(dir.path()).unwrap();
    fs.set(Collection::Transactions.key(), seeded).unwrap();

    let mut state = AppState::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(state.transactions().len(), 1);
    assert_eq!(state.transactions()[0].id, "1");

    let mut gift = draft("5", "Gift", (2024, 3, 3));
    gift.kind = TransactionType::Income;
    state.add_transaction(gift).unwrap();

    let reloaded = AppState::load(FileStore::open(dir.path()).unwrap());
    let ids: Vec<&str> = reloaded.transactions().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1], "1");

    let backup = fs.get(&Collection::Transactions.backup_key()).unwrap();
    assert_eq!(backup.as_deref(), Some(seeded));
}

#[test]
fn failed_save_keeps_change_in_memory() {
    let mut state = AppState::load(MemoryStore::with_quota(16));
    let saved = state.add_transaction(draft("10", "Fuel", (2024, 3, 1))).unwrap();
    assert!(!saved.durable);
    assert_eq!(state.transactions().len(), 1);
}

#[test]
fn delete_by_unique_prefix() {
    let dir = tempdir().unwrap();
    let mut state = AppState::load(FileStore::open(dir.path()).unwrap());
    let kept = state.add_transaction(draft("10", "Fuel", (2024, 3, 1))).unwrap();
    let gone = state.add_transaction(draft("20", "Fuel", (2024, 3, 2))).unwrap();

    let id = state.resolve_transaction_id(&gone.value.id[..8]).unwrap();
    assert_eq!(id, gone.value.id);
    let removed = state.delete_transaction(&id).unwrap();
    assert_eq!(removed.value.amount, d("20"));

    let reloaded = AppState::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(reloaded.transactions().len(), 1);
    assert_eq!(reloaded.transactions()[0].id, kept.value.id);

    let err = state.delete_transaction("no-such-id").unwrap_err();
    assert!(matches!(err, EditError::NotFound { kind: "transaction", .. }));
    assert!(state.resolve_transaction_id("").is_err());
}

#[test]
fn shares_and_funds_validate_required_fields() {
    let mut state = AppState::load(MemoryStore::new());
    let err = state
        .add_share(NewShare {
            name: Some("Acme".into()),
            units: Some(d("3")),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, EditError::Invalid(ValidationError::MissingBuyPrice)));

    let share = state
        .add_share(NewShare {
            name: Some("Acme".into()),
            code: Some("acm".into()),
            units: Some(d("3")),
            buy_price: Some(d("10")),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(share.value.code, "ACM");
    assert_eq!(share.value.current_price, d("10"));

    let err = state
        .add_fund(NewFund {
            name: Some("Index".into()),
            amount_invested: Some(d("100")),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, EditError::Invalid(ValidationError::MissingCurrentValue)));

    let fund = state
        .add_fund(NewFund {
            name: Some("Index".into()),
            amount_invested: Some(d("100")),
            current_value: Some(d("90")),
            buy_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        })
        .unwrap();
    assert_eq!(fund.value.profit_loss(), d("-10"));

    state.delete_share(&share.value.id).unwrap();
    state.delete_fund(&fund.value.id).unwrap();
    assert!(state.shares().is_empty());
    assert!(state.funds().is_empty());
}
