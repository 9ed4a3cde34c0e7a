// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn rows() -> Vec<Vec<String>> {
    let tagged = |kind: &str, c: &Category| {
        vec![
            kind.to_string(),
            c.label().to_string(),
            if c.is_parent_related() { "shared" } else { "personal" }.to_string(),
        ]
    };
    INCOME_CATEGORIES
        .iter()
        .map(|c| tagged("income", c))
        .chain(EXPENSE_CATEGORIES.iter().map(|c| tagged("expense", c)))
        .collect()
}

pub fn handle() -> Result<()> {
    println!("{}", pretty_table(&["Type", "Category", "Ledger"], rows()));
    println!("Any other label is accepted and tracked as a personal category.");
    Ok(())
}
