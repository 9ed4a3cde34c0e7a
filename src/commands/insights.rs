// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::insights::{self, InsightGenerator};
use crate::ledger;
use crate::models::Transaction;
use crate::utils::month_arg;
use anyhow::Result;

/// Renders the analysis of the month's personal transactions.
pub fn run(
    transactions: &[Transaction],
    generator: &InsightGenerator,
    sub: &clap::ArgMatches,
) -> Result<String> {
    let month = month_arg(sub)?;
    let view = ledger::monthly_personal(transactions, month);
    let records = insights::simplify(view.filtered.iter().copied());
    let result = generator.analyze(&records, &month.label());
    Ok(InsightGenerator::render(result))
}

pub fn handle(
    transactions: &[Transaction],
    generator: &InsightGenerator,
    sub: &clap::ArgMatches,
) -> Result<()> {
    if generator.is_configured() {
        eprintln!("Analyzing...");
    }
    println!("{}", run(transactions, generator, sub)?);
    Ok(())
}
