// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::models::{Fund, Record, Share};

// Saturating: a position that skipped validation still displays instead of
// panicking. Summaries leave such positions out entirely.
impl Share {
    pub fn cost_basis(&self) -> Decimal {
        self.units.saturating_mul(self.buy_price)
    }

    pub fn current_value(&self) -> Decimal {
        self.units.saturating_mul(self.current_price)
    }

    pub fn profit_loss(&self) -> Decimal {
        self.current_value().saturating_sub(self.cost_basis())
    }
}

impl Fund {
    pub fn profit_loss(&self) -> Decimal {
        self.current_value.saturating_sub(self.amount_invested)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Holdings {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub invested: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_loss: Decimal,
}

impl Holdings {
    fn add(&mut self, invested: Decimal, current_value: Decimal) {
        self.count += 1;
        self.invested = self.invested.saturating_add(invested);
        self.current_value = self.current_value.saturating_add(current_value);
        self.profit_loss = self.current_value.saturating_sub(self.invested);
    }

    /// Profit/loss as a percentage of the amount invested; `None` when
    /// nothing was invested or the ratio is out of range.
    pub fn return_pct(&self) -> Option<Decimal> {
        let ratio = self.profit_loss.checked_div(self.invested)?;
        Some(ratio.checked_mul(Decimal::ONE_HUNDRED)?.round_dp(2))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub shares: Holdings,
    pub funds: Holdings,
    pub total: Holdings,
    /// Dividends recorded across all share positions.
    #[serde(with = "rust_decimal::serde::float")]
    pub dividends: Decimal,
}

impl PortfolioSummary {
    /// Positions beyond the amount limits are logged and left out.
    pub fn from_holdings(shares: &[Share], funds: &[Fund]) -> Self {
        let mut out = Self::default();
        for s in shares {
            if let Err(err) = s.check() {
                warn!(id = %s.id, %err, "share left out of summary");
                continue;
            }
            out.shares.add(s.cost_basis(), s.current_value());
            out.total.add(s.cost_basis(), s.current_value());
            out.dividends = out
                .dividends
                .saturating_add(s.dividend_amount.unwrap_or_default());
        }
        for f in funds {
            if let Err(err) = f.check() {
                warn!(id = %f.id, %err, "fund left out of summary");
                continue;
            }
            out.funds.add(f.amount_invested, f.current_value);
            out.total.add(f.amount_invested, f.current_value);
        }
        out
    }
}
