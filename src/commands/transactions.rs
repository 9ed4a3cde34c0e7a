// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::ledger::{self, PersonalMonth};
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::state::AppState;
use crate::store::KeyValueStore;
use crate::utils::{
    fmt_money, maybe_print_json, month_arg, optional_date, parse_decimal, pretty_table, required,
    short_id,
};
use anyhow::{Result, anyhow};

pub fn handle<S: KeyValueStore>(
    state: &mut AppState<S>,
    cfg: &AppConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(state, cfg, sub)?,
        Some(("list", sub)) => list(state, cfg, sub)?,
        Some(("rm", sub)) => rm(state, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| TransactionType::parse(s).ok_or_else(|| anyhow!("Invalid type '{}'", s)))
        .transpose()?
        .unwrap_or(TransactionType::Expense);
    Ok(NewTransaction {
        amount: Some(parse_decimal(required(sub, "amount")?)?),
        kind,
        category: sub.get_one::<String>("category").cloned(),
        note: sub.get_one::<String>("note").cloned(),
        date: optional_date(sub, "date")?,
    })
}

fn add<S: KeyValueStore>(
    state: &mut AppState<S>,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let saved = state.add_transaction(draft_from_args(sub)?)?;
    let t = &saved.value;
    let ledger = if t.is_parent_related() { "shared" } else { "personal" };
    println!(
        "Recorded {} {} in '{}' on {} ({} ledger, id {})",
        t.kind,
        fmt_money(&t.amount, &cfg.currency),
        t.category,
        t.date.get(..10).unwrap_or(&t.date),
        ledger,
        short_id(&t.id)
    );
    if !saved.durable {
        eprintln!("warning: transaction kept for this session but could not be saved");
    }
    Ok(())
}

pub fn query_rows<'a>(
    transactions: &'a [Transaction],
    sub: &clap::ArgMatches,
) -> Result<PersonalMonth<'a>> {
    Ok(ledger::monthly_personal(transactions, month_arg(sub)?))
}

fn list<S: KeyValueStore>(
    state: &AppState<S>,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = query_rows(state.transactions(), sub)?;
    if jsonl_flag {
        maybe_print_json(false, true, &view.filtered)?;
        return Ok(());
    }
    if maybe_print_json(json_flag, false, &view)? {
        return Ok(());
    }

    println!(
        "{}: income {} | expense {} | balance {}",
        view.month.label(),
        fmt_money(&view.income, &cfg.currency),
        fmt_money(&view.expense, &cfg.currency),
        fmt_money(&view.balance, &cfg.currency)
    );
    let mut rows = Vec::new();
    for group in &view.by_day {
        for (i, t) in group.transactions.iter().enumerate() {
            let day = if i == 0 {
                group.date.format("%a %d %b").to_string()
            } else {
                String::new()
            };
            let signed = match t.kind {
                TransactionType::Income => format!("+{:.2}", t.amount),
                TransactionType::Expense => format!("-{:.2}", t.amount),
            };
            rows.push(vec![
                day,
                short_id(&t.id),
                t.category.to_string(),
                signed,
                t.note.clone().unwrap_or_default(),
            ]);
        }
    }
    if rows.is_empty() {
        println!("No personal transactions this month.");
    } else {
        println!(
            "{}",
            pretty_table(&["Day", "ID", "Category", "Amount", "Note"], rows)
        );
    }
    if !view.skipped.is_empty() {
        eprintln!(
            "warning: {} transaction(s) with unreadable dates were left out",
            view.skipped.len()
        );
    }
    Ok(())
}

fn rm<S: KeyValueStore>(
    state: &mut AppState<S>,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = state.resolve_transaction_id(required(sub, "id")?)?;
    let saved = state.delete_transaction(&id)?;
    println!(
        "Deleted {} {} in '{}' ({})",
        saved.value.kind,
        fmt_money(&saved.value.amount, &cfg.currency),
        saved.value.category,
        short_id(&saved.value.id)
    );
    if !saved.durable {
        eprintln!("warning: deletion applied for this session but could not be saved");
    }
    Ok(())
}
