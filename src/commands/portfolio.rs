// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::{NewFund, NewShare};
use crate::portfolio::{Holdings, PortfolioSummary};
use crate::state::AppState;
use crate::store::KeyValueStore;
use crate::utils::{
    fmt_money, fmt_signed, maybe_print_json, optional_date, optional_decimal, pretty_table,
    required, short_id,
};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(
    state: &mut AppState<S>,
    cfg: &AppConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("share", sub)) => match sub.subcommand() {
            Some(("add", s)) => add_share(state, cfg, s)?,
            Some(("list", s)) => list_shares(state, s)?,
            Some(("rm", s)) => {
                let id = state.resolve_share_id(required(s, "id")?)?;
                let saved = state.delete_share(&id)?;
                println!("Deleted share {} ({})", saved.value.name, short_id(&saved.value.id));
                warn_not_durable(saved.durable);
            }
            _ => {}
        },
        Some(("fund", sub)) => match sub.subcommand() {
            Some(("add", s)) => add_fund(state, cfg, s)?,
            Some(("list", s)) => list_funds(state, s)?,
            Some(("rm", s)) => {
                let id = state.resolve_fund_id(required(s, "id")?)?;
                let saved = state.delete_fund(&id)?;
                println!("Deleted fund {} ({})", saved.value.name, short_id(&saved.value.id));
                warn_not_durable(saved.durable);
            }
            _ => {}
        },
        Some(("summary", sub)) => summary(state, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn warn_not_durable(durable: bool) {
    if !durable {
        eprintln!("warning: change kept for this session but could not be saved");
    }
}

pub fn share_from_args(sub: &clap::ArgMatches) -> Result<NewShare> {
    Ok(NewShare {
        name: sub.get_one::<String>("name").cloned(),
        code: sub.get_one::<String>("code").cloned(),
        units: optional_decimal(sub, "units")?,
        buy_price: optional_decimal(sub, "buy-price")?,
        current_price: optional_decimal(sub, "current-price")?,
        buy_date: optional_date(sub, "buy-date")?,
        dividend_date: optional_date(sub, "dividend-date")?,
        dividend_amount: optional_decimal(sub, "dividend-amount")?,
    })
}

pub fn fund_from_args(sub: &clap::ArgMatches) -> Result<NewFund> {
    Ok(NewFund {
        name: sub.get_one::<String>("name").cloned(),
        amount_invested: optional_decimal(sub, "invested")?,
        current_value: optional_decimal(sub, "current-value")?,
        buy_date: optional_date(sub, "buy-date")?,
    })
}

fn add_share<S: KeyValueStore>(
    state: &mut AppState<S>,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let saved = state.add_share(share_from_args(sub)?)?;
    let s = &saved.value;
    println!(
        "Added {} x {} ({}) @ {} (id {})",
        s.units,
        s.name,
        if s.code.is_empty() { "-" } else { s.code.as_str() },
        fmt_money(&s.buy_price, &cfg.currency),
        short_id(&s.id)
    );
    warn_not_durable(saved.durable);
    Ok(())
}

fn list_shares<S: KeyValueStore>(state: &AppState<S>, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &state.shares())? {
        return Ok(());
    }
    let rows = state
        .shares()
        .iter()
        .map(|s| {
            let dividend = match (s.dividend_amount, s.dividend_date) {
                (Some(a), Some(d)) => format!("{:.2} ({})", a, d),
                (Some(a), None) => format!("{:.2}", a),
                (None, Some(d)) => d.to_string(),
                (None, None) => String::new(),
            };
            vec![
                short_id(&s.id),
                s.code.clone(),
                s.name.clone(),
                format!("{:.4}", s.units),
                format!("{:.2}", s.buy_price),
                format!("{:.2}", s.current_price),
                format!("{:.2}", s.current_value()),
                fmt_signed(&s.profit_loss()),
                s.buy_date.to_string(),
                dividend,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Code", "Name", "Units", "Buy", "Price", "Value", "P/L", "Bought", "Dividend"],
            rows,
        )
    );
    Ok(())
}

fn add_fund<S: KeyValueStore>(
    state: &mut AppState<S>,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let saved = state.add_fund(fund_from_args(sub)?)?;
    let f = &saved.value;
    println!(
        "Added fund {}: invested {}, now {} (id {})",
        f.name,
        fmt_money(&f.amount_invested, &cfg.currency),
        fmt_money(&f.current_value, &cfg.currency),
        short_id(&f.id)
    );
    warn_not_durable(saved.durable);
    Ok(())
}

fn list_funds<S: KeyValueStore>(state: &AppState<S>, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &state.funds())? {
        return Ok(());
    }
    let rows = state
        .funds()
        .iter()
        .map(|f| {
            vec![
                short_id(&f.id),
                f.name.clone(),
                f.buy_date.to_string(),
                format!("{:.2}", f.amount_invested),
                format!("{:.2}", f.current_value),
                fmt_signed(&f.profit_loss()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Bought", "Invested", "Value", "P/L"], rows)
    );
    Ok(())
}

fn holdings_row(label: &str, h: &Holdings, ccy: &str) -> Vec<String> {
    vec![
        label.to_string(),
        h.count.to_string(),
        fmt_money(&h.invested, ccy),
        fmt_money(&h.current_value, ccy),
        fmt_signed(&h.profit_loss),
        h.return_pct()
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".into()),
    ]
}

fn summary<S: KeyValueStore>(
    state: &AppState<S>,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let s = PortfolioSummary::from_holdings(state.shares(), state.funds());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let ccy = cfg.currency.as_str();
    println!(
        "{}",
        pretty_table(
            &["", "Positions", "Invested", "Value", "P/L", "Return"],
            vec![
                holdings_row("Shares", &s.shares, ccy),
                holdings_row("Funds", &s.funds, ccy),
                holdings_row("Total", &s.total, ccy),
            ],
        )
    );
    if !s.dividends.is_zero() {
        println!("Dividends recorded: {}", fmt_money(&s.dividends, ccy));
    }
    Ok(())
}
