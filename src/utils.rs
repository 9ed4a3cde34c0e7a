// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::month::Month;

const UA: &str = concat!(
    "spendsmart/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/spendsmart)"
);

pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Month> {
    Ok(s.parse::<Month>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// `--month` if given, otherwise the current month.
pub fn month_arg(sub: &clap::ArgMatches) -> Result<Month> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => Ok(Month::current()),
    }
}

pub fn required<'a>(sub: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    sub.get_one::<String>(id)
        .with_context(|| format!("Missing required argument --{}", id))
}

pub fn optional_decimal(sub: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    sub.get_one::<String>(id).map(|s| parse_decimal(s)).transpose()
}

pub fn optional_date(sub: &clap::ArgMatches, id: &str) -> Result<Option<NaiveDate>> {
    sub.get_one::<String>(id).map(|s| parse_date(s)).transpose()
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

/// Leading `+` for non-negative amounts, used for profit/loss columns.
pub fn fmt_signed(d: &Decimal) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        format!("{:.2}", d.round_dp(2))
    } else {
        format!("+{:.2}", d.round_dp(2))
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
