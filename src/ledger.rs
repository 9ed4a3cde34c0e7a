// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly views over the flat transaction collection.
//!
//! Every function here is pure: the output depends only on the slice and
//! the reference month passed in. Totals are recomputed from the whole
//! history on each call, so there is no running-balance cache to go stale.
//! Transactions whose `date` cannot be parsed, or whose amount is beyond
//! [`MAX_AMOUNT`](crate::models::MAX_AMOUNT), are left out of every total,
//! logged, and reported back in `skipped`. With every amount bounded, sums
//! cannot overflow.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::models::{Category, Record, Transaction, TransactionType};
use crate::month::Month;

/// Expense categories treated as transfers rather than spending in the
/// daily chart. "Saving" moves money aside, it is not consumption.
pub const DEFAULT_EXCLUDED_EXPENSES: &[Category] = &[Category::Saving];

#[derive(Debug, Clone, Serialize)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub transactions: Vec<&'a Transaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalMonth<'a> {
    pub month: Month,
    pub filtered: Vec<&'a Transaction>,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Most recent day first; members newest first.
    pub by_day: Vec<DayGroup<'a>>,
    pub skipped: Vec<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedMonth<'a> {
    pub month: Month,
    #[serde(with = "rust_decimal::serde::float")]
    pub opening_balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub month_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub month_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_change: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub closing_balance: Decimal,
    pub activity: Vec<&'a Transaction>,
    pub skipped: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub day: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats<'a> {
    pub month: Month,
    pub series: Vec<DailyTotals>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    /// Personal expenses booked to the excluded categories.
    #[serde(with = "rust_decimal::serde::float")]
    pub set_aside: Decimal,
    pub skipped: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

type Dated<'a> = (NaiveDateTime, &'a Transaction);

/// Parses timestamps for the transactions selected by `keep`. Unparseable
/// ones, and amounts beyond the limit, go to `skipped` instead.
fn dated<'a>(
    transactions: &'a [Transaction],
    keep: impl Fn(&Transaction) -> bool,
    skipped: &mut Vec<&'a str>,
) -> Vec<Dated<'a>> {
    let mut out = Vec::with_capacity(transactions.len());
    for t in transactions.iter().filter(|t| keep(*t)) {
        if let Err(err) = t.check() {
            warn!(id = %t.id, %err, "skipping transaction with out-of-range amount");
            skipped.push(t.id.as_str());
            continue;
        }
        match t.timestamp() {
            Ok(ts) => out.push((ts, t)),
            Err(err) => {
                warn!(id = %t.id, %err, "skipping transaction with unparseable date");
                skipped.push(t.id.as_str());
            }
        }
    }
    out
}

fn personal_in_month<'a>(
    transactions: &'a [Transaction],
    month: Month,
    skipped: &mut Vec<&'a str>,
) -> Vec<Dated<'a>> {
    dated(transactions, |t| !t.is_parent_related(), skipped)
        .into_iter()
        .filter(|(ts, _)| month.contains(ts))
        .collect()
}

// Stable, so equal timestamps keep collection order.
fn newest_first(items: &mut [Dated<'_>]) {
    items.sort_by(|a, b| b.0.cmp(&a.0));
}

fn totals<'a>(items: impl IntoIterator<Item = &'a Transaction>) -> (Decimal, Decimal) {
    items
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| match t.kind {
            TransactionType::Income => (inc + t.amount, exp),
            TransactionType::Expense => (inc, exp + t.amount),
        })
}

/// Expects `items` newest first, which makes the groups come out most
/// recent day first as well.
fn group_by_day<'a>(items: &[Dated<'a>]) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for (ts, t) in items {
        let date = ts.date();
        match groups.last_mut() {
            Some(g) if g.date == date => g.transactions.push(*t),
            _ => groups.push(DayGroup {
                date,
                transactions: vec![*t],
            }),
        }
    }
    groups
}

/// Personal (non-household) transactions of `month` with their totals.
pub fn monthly_personal(transactions: &[Transaction], month: Month) -> PersonalMonth<'_> {
    let mut skipped = Vec::new();
    let mut items = personal_in_month(transactions, month, &mut skipped);
    newest_first(&mut items);

    let (income, expense) = totals(items.iter().map(|(_, t)| *t));
    let by_day = group_by_day(&items);
    PersonalMonth {
        month,
        filtered: items.into_iter().map(|(_, t)| t).collect(),
        income,
        expense,
        balance: income - expense,
        by_day,
        skipped,
    }
}

/// Household statement for `month`: carry-forward opening balance, the
/// month's movements and the resulting closing balance.
pub fn monthly_shared(transactions: &[Transaction], month: Month) -> SharedMonth<'_> {
    let mut skipped = Vec::new();
    let shared = dated(transactions, Transaction::is_parent_related, &mut skipped);

    let start = month.start();
    let opening_balance: Decimal = shared
        .iter()
        .filter(|(ts, _)| *ts < start)
        .map(|(_, t)| t.signed_amount())
        .sum();

    let mut activity: Vec<Dated<'_>> = shared
        .into_iter()
        .filter(|(ts, _)| month.contains(ts))
        .collect();
    newest_first(&mut activity);

    let (month_income, month_expense) = totals(activity.iter().map(|(_, t)| *t));
    let net_change = month_income - month_expense;
    SharedMonth {
        month,
        opening_balance,
        month_income,
        month_expense,
        net_change,
        closing_balance: opening_balance + net_change,
        activity: activity.into_iter().map(|(_, t)| t).collect(),
        skipped,
    }
}

fn fill_series<'a>(
    items: &[Dated<'a>],
    month: Month,
    excluded: &[Category],
) -> Vec<DailyTotals> {
    let mut series: Vec<DailyTotals> = (1..=month.days_in_month())
        .map(|day| DailyTotals {
            day,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();

    for (ts, t) in items {
        let Some(entry) = series.get_mut(ts.day0() as usize) else {
            continue;
        };
        match t.kind {
            TransactionType::Income => entry.income += t.amount,
            TransactionType::Expense if !excluded.contains(&t.category) => {
                entry.expense += t.amount
            }
            TransactionType::Expense => {}
        }
    }
    series
}

/// Dense per-day income/expense for `month`, one entry per calendar day.
pub fn daily_series(
    transactions: &[Transaction],
    month: Month,
    excluded: &[Category],
) -> Vec<DailyTotals> {
    let mut skipped = Vec::new();
    let items = personal_in_month(transactions, month, &mut skipped);
    fill_series(&items, month, excluded)
}

pub fn monthly_stats<'a>(
    transactions: &'a [Transaction],
    month: Month,
    excluded: &[Category],
) -> MonthlyStats<'a> {
    let mut skipped = Vec::new();
    let items = personal_in_month(transactions, month, &mut skipped);
    let series = fill_series(&items, month, excluded);

    let total_income: Decimal = series.iter().map(|d| d.income).sum();
    let total_expense: Decimal = series.iter().map(|d| d.expense).sum();
    let set_aside: Decimal = items
        .iter()
        .filter(|(_, t)| t.kind == TransactionType::Expense && excluded.contains(&t.category))
        .map(|(_, t)| t.amount)
        .sum();

    MonthlyStats {
        month,
        series,
        total_income,
        total_expense,
        set_aside,
        skipped,
    }
}

/// Personal spending per category, largest first.
pub fn expense_by_category(transactions: &[Transaction], month: Month) -> Vec<CategoryTotal> {
    let mut skipped = Vec::new();
    let mut out: Vec<CategoryTotal> = Vec::new();
    for (_, t) in personal_in_month(transactions, month, &mut skipped) {
        if t.kind != TransactionType::Expense {
            continue;
        }
        match out.iter_mut().find(|c| c.category == t.category) {
            Some(c) => c.amount += t.amount,
            None => out.push(CategoryTotal {
                category: t.category.clone(),
                amount: t.amount,
            }),
        }
    }
    out.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.label().cmp(b.category.label()))
    });
    out
}
