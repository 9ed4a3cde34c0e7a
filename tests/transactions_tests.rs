// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use spendsmart::config::AppConfig;
use spendsmart::models::{Category, TransactionType};
use spendsmart::state::AppState;
use spendsmart::store::MemoryStore;
use spendsmart::{cli, commands::reports, commands::transactions};

fn config() -> AppConfig {
    AppConfig {
        data_dir: PathBuf::from("/tmp/spendsmart-test"),
        api_key: None,
        model: "gemini-2.5-flash".into(),
        gemini_url: "https://example.test".into(),
        http_timeout: Duration::from_secs(1),
        currency: "USD".into(),
    }
}

fn run_tx(state: &mut AppState<MemoryStore>, args: &[&str]) {
    let mut argv = vec!["spendsmart", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(state, &config(), tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

fn seeded() -> AppState<MemoryStore> {
    let mut state = AppState::load(MemoryStore::new());
    for (amount, kind, category, date) in [
        ("100", "income", "Salary", "2025-01-01"),
        ("10", "expense", "Fuel", "2025-01-02"),
        ("25", "expense", "Parents", "2025-01-02"),
        ("7", "expense", "brunch", "2025-01-03"),
        ("50", "expense", "Saving", "2025-01-03"),
        ("99", "expense", "Fuel", "2024-12-31"),
    ] {
        run_tx(
            &mut state,
            &[
                "add", "--amount", amount, "--type", kind, "--category", category, "--date", date,
            ],
        );
    }
    state
}

#[test]
fn add_parses_arguments() {
    let state = seeded();
    assert_eq!(state.transactions().len(), 6);
    let newest = &state.transactions()[0];
    assert_eq!(newest.amount, Decimal::from(99));
    assert_eq!(newest.kind, TransactionType::Expense);
    assert_eq!(newest.date, "2024-12-31T00:00:00.000Z");
    assert_eq!(state.transactions()[2].category, Category::Brunch);
}

#[test]
fn list_shows_personal_month() {
    let state = seeded();
    let matches = cli::build_cli().get_matches_from(["spendsmart", "tx", "list", "--month", "2025-01"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let view = transactions::query_rows(state.transactions(), list_m).unwrap();
    assert_eq!(view.filtered.len(), 4);
    assert_eq!(view.income, Decimal::from(100));
    assert_eq!(view.expense, Decimal::from(67));
    assert_eq!(view.balance, Decimal::from(33));
    assert_eq!(view.by_day.len(), 3);
    assert_eq!(view.by_day[0].date.to_string(), "2025-01-03");
}

#[test]
fn stats_default_excludes_saving() {
    let state = seeded();
    let matches = cli::build_cli().get_matches_from(["spendsmart", "stats", "--month", "2025-01"]);
    let Some(("stats", sub)) = matches.subcommand() else {
        panic!("no stats subcommand");
    };
    let stats = reports::query_stats(state.transactions(), sub).unwrap();
    assert_eq!(stats.series.len(), 31);
    assert_eq!(stats.series[2].expense, Decimal::from(7));
    assert_eq!(stats.total_expense, Decimal::from(17));
    assert_eq!(stats.set_aside, Decimal::from(50));

    let matches = cli::build_cli().get_matches_from([
        "spendsmart", "stats", "--month", "2025-01", "--exclude", "Fuel",
    ]);
    let Some(("stats", sub)) = matches.subcommand() else {
        panic!("no stats subcommand");
    };
    let stats = reports::query_stats(state.transactions(), sub).unwrap();
    assert_eq!(stats.total_expense, Decimal::from(57));
    assert_eq!(stats.set_aside, Decimal::from(10));
}

#[test]
fn rm_accepts_id_prefix() {
    let mut state = seeded();
    let target = state.transactions()[1].id.clone();
    run_tx(&mut state, &["rm", &target[..8]]);
    assert_eq!(state.transactions().len(), 5);
    assert!(state.transactions().iter().all(|t| t.id != target));
}
