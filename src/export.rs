// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Transaction;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown format: {0} (use csv|json)")]
    UnknownFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// `spendsmart_backup_2024-03-05.json`
pub fn backup_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!("spendsmart_backup_{}.{}", date, format.extension())
}

/// Writes the full collection. Returns the number of records written.
pub fn export_transactions(
    transactions: &[Transaction],
    out: &Path,
    format: ExportFormat,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Json => {
            fs::write(out, serde_json::to_string_pretty(transactions)?)?;
        }
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "type", "category", "amount", "note"])?;
            for t in transactions {
                let amount = t.amount.to_string();
                wtr.write_record([
                    t.id.as_str(),
                    t.date.as_str(),
                    t.kind.as_str(),
                    t.category.label(),
                    amount.as_str(),
                    t.note.as_deref().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
    }
    Ok(transactions.len())
}
