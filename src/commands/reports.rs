// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::ledger::{self, DEFAULT_EXCLUDED_EXPENSES, MonthlyStats};
use crate::models::{Category, Transaction, TransactionType};
use crate::utils::{fmt_money, maybe_print_json, month_arg, pretty_table, short_id};
use anyhow::Result;

pub fn parents(transactions: &[Transaction], cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = ledger::monthly_shared(transactions, month_arg(sub)?);
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let ccy = cfg.currency.as_str();
    println!("{} Statement", view.month.label());
    println!(
        "{}",
        pretty_table(
            &["", "Amount"],
            vec![
                vec!["Opening Balance".into(), fmt_money(&view.opening_balance, ccy)],
                vec!["Month Contributions".into(), format!("+{}", fmt_money(&view.month_income, ccy))],
                vec!["Month Expenses".into(), format!("-{}", fmt_money(&view.month_expense, ccy))],
                vec!["Closing Balance".into(), fmt_money(&view.closing_balance, ccy)],
            ],
        )
    );

    if view.activity.is_empty() {
        println!("No parent-related activity this month.");
    } else {
        let rows = view
            .activity
            .iter()
            .map(|t| {
                let amount = match t.kind {
                    TransactionType::Income => format!("+{:.2}", t.amount),
                    TransactionType::Expense => format!("{:.2}", t.amount),
                };
                vec![
                    t.date.get(..10).unwrap_or(&t.date).to_string(),
                    short_id(&t.id),
                    t.category.to_string(),
                    amount,
                    t.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "ID", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

pub fn excluded_categories(sub: &clap::ArgMatches) -> Vec<Category> {
    match sub.get_many::<String>("exclude") {
        Some(vals) => vals.map(|v| Category::from_label(v)).collect(),
        None => DEFAULT_EXCLUDED_EXPENSES.to_vec(),
    }
}

pub fn query_stats<'a>(
    transactions: &'a [Transaction],
    sub: &clap::ArgMatches,
) -> Result<MonthlyStats<'a>> {
    let excluded = excluded_categories(sub);
    Ok(ledger::monthly_stats(transactions, month_arg(sub)?, &excluded))
}

pub fn stats(transactions: &[Transaction], cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = query_stats(transactions, sub)?;
    if jsonl_flag {
        maybe_print_json(false, true, &view.series)?;
        return Ok(());
    }
    if maybe_print_json(json_flag, false, &view)? {
        return Ok(());
    }

    let excluded: Vec<String> = excluded_categories(sub)
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!("{} (excl. {})", view.month.label(), excluded.join(", "));
    let ccy = cfg.currency.as_str();
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Saved"],
            vec![vec![
                fmt_money(&view.total_income, ccy),
                fmt_money(&view.total_expense, ccy),
                fmt_money(&view.set_aside, ccy),
            ]],
        )
    );
    let rows = view
        .series
        .iter()
        .map(|d| {
            vec![
                d.day.to_string(),
                format!("{:.2}", d.income),
                format!("{:.2}", d.expense),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Day", "Income", "Expense"], rows));
    Ok(())
}

pub fn spend(transactions: &[Transaction], cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = month_arg(sub)?;
    let data = ledger::expense_by_category(transactions, month);
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|c| vec![c.category.to_string(), fmt_money(&c.amount, &cfg.currency)])
        .collect();
    println!("{}", month.label());
    println!("{}", pretty_table(&["Category", "Spent"], rows));
    Ok(())
}
