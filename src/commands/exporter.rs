// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use crate::export::{ExportFormat, backup_file_name, export_transactions};
use crate::models::Transaction;
use anyhow::{Context, Result};
use chrono::Local;

/// Writes the backup and returns where it went.
pub fn handle(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<PathBuf> {
    let fmt: ExportFormat = sub
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json")
        .parse()?;
    let out = match sub.get_one::<String>("out") {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(backup_file_name(Local::now().date_naive(), fmt)),
    };
    let count = export_transactions(transactions, &out, fmt)
        .with_context(|| format!("Export to {}", out.display()))?;
    println!("Exported {} transactions to {}", count, out.display());
    Ok(out)
}
