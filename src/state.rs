// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state: the three collections plus the store they live in.
//!
//! Every mutation builds a new collection, swaps it in, then writes the
//! whole collection back. A failed write keeps the in-memory change and is
//! reported through [`Saved::durable`].

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Fund, NewFund, NewShare, NewTransaction, Share, Transaction, ValidationError};
use crate::store::{self, Collection, KeyValueStore};

#[derive(Debug, Error)]
pub enum EditError {
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),
    #[error("no {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },
    #[error("id prefix '{prefix}' matches {count} {kind} records")]
    Ambiguous {
        kind: &'static str,
        prefix: String,
        count: usize,
    },
}

/// Result of a mutation. `durable` is false when the store rejected the write.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub value: T,
    pub durable: bool,
}

#[derive(Debug)]
pub struct AppState<S: KeyValueStore> {
    store: S,
    transactions: Vec<Transaction>,
    shares: Vec<Share>,
    funds: Vec<Fund>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Unreadable stored data is backed up and left out; see [`store::recover`].
    pub fn load(mut store: S) -> Self {
        let transactions = store::recover(&mut store, Collection::Transactions);
        let shares = store::recover(&mut store, Collection::Shares);
        let funds = store::recover(&mut store, Collection::Funds);
        info!(
            transactions = transactions.len(),
            shares = shares.len(),
            funds = funds.len(),
            "state loaded"
        );
        Self {
            store,
            transactions,
            shares,
            funds,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn funds(&self) -> &[Fund] {
        &self.funds
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add_transaction(
        &mut self,
        draft: NewTransaction,
    ) -> Result<Saved<Transaction>, EditError> {
        let tx = draft.validate(new_id(), today())?;
        let mut updated = Vec::with_capacity(self.transactions.len() + 1);
        updated.push(tx.clone());
        updated.extend(self.transactions.iter().cloned());
        self.transactions = updated;
        info!(id = %tx.id, category = %tx.category, "transaction added");
        let durable = persist(&mut self.store, Collection::Transactions, &self.transactions);
        Ok(Saved { value: tx, durable })
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Saved<Transaction>, EditError> {
        let (removed, kept) = split_off(&self.transactions, id, |t| &t.id, "transaction")?;
        self.transactions = kept;
        info!(id, "transaction deleted");
        let durable = persist(&mut self.store, Collection::Transactions, &self.transactions);
        Ok(Saved {
            value: removed,
            durable,
        })
    }

    pub fn add_share(&mut self, draft: NewShare) -> Result<Saved<Share>, EditError> {
        let share = draft.validate(new_id(), today())?;
        let mut updated = self.shares.clone();
        updated.push(share.clone());
        self.shares = updated;
        info!(id = %share.id, code = %share.code, "share added");
        let durable = persist(&mut self.store, Collection::Shares, &self.shares);
        Ok(Saved {
            value: share,
            durable,
        })
    }

    pub fn delete_share(&mut self, id: &str) -> Result<Saved<Share>, EditError> {
        let (removed, kept) = split_off(&self.shares, id, |s| &s.id, "share")?;
        self.shares = kept;
        info!(id, "share deleted");
        let durable = persist(&mut self.store, Collection::Shares, &self.shares);
        Ok(Saved {
            value: removed,
            durable,
        })
    }

    pub fn add_fund(&mut self, draft: NewFund) -> Result<Saved<Fund>, EditError> {
        let fund = draft.validate(new_id(), today())?;
        let mut updated = self.funds.clone();
        updated.push(fund.clone());
        self.funds = updated;
        info!(id = %fund.id, name = %fund.name, "fund added");
        let durable = persist(&mut self.store, Collection::Funds, &self.funds);
        Ok(Saved {
            value: fund,
            durable,
        })
    }

    pub fn delete_fund(&mut self, id: &str) -> Result<Saved<Fund>, EditError> {
        let (removed, kept) = split_off(&self.funds, id, |f| &f.id, "fund")?;
        self.funds = kept;
        info!(id, "fund deleted");
        let durable = persist(&mut self.store, Collection::Funds, &self.funds);
        Ok(Saved {
            value: removed,
            durable,
        })
    }

    pub fn resolve_transaction_id(&self, prefix: &str) -> Result<String, EditError> {
        resolve(self.transactions.iter().map(|t| t.id.as_str()), prefix, "transaction")
    }

    pub fn resolve_share_id(&self, prefix: &str) -> Result<String, EditError> {
        resolve(self.shares.iter().map(|s| s.id.as_str()), prefix, "share")
    }

    pub fn resolve_fund_id(&self, prefix: &str) -> Result<String, EditError> {
        resolve(self.funds.iter().map(|f| f.id.as_str()), prefix, "fund")
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn persist<T: Serialize>(
    store: &mut dyn KeyValueStore,
    collection: Collection,
    items: &[T],
) -> bool {
    match store::save(store, collection, items) {
        Ok(()) => true,
        Err(err) => {
            warn!(key = collection.key(), %err, "change kept in memory but not saved");
            false
        }
    }
}

fn split_off<T: Clone>(
    items: &[T],
    id: &str,
    id_of: impl Fn(&T) -> &String,
    kind: &'static str,
) -> Result<(T, Vec<T>), EditError> {
    let removed = items
        .iter()
        .find(|it| id_of(*it) == id)
        .cloned()
        .ok_or_else(|| EditError::NotFound {
            kind,
            id: id.to_string(),
        })?;
    let kept = items.iter().filter(|it| id_of(*it) != id).cloned().collect();
    Ok((removed, kept))
}

/// Exact id wins; otherwise the prefix must match exactly one id.
fn resolve<'a>(
    ids: impl Iterator<Item = &'a str>,
    prefix: &str,
    kind: &'static str,
) -> Result<String, EditError> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(EditError::NotFound {
            kind,
            id: String::new(),
        });
    }
    let matches: Vec<&str> = ids.filter(|id| id.starts_with(prefix)).collect();
    if let Some(exact) = matches.iter().find(|id| **id == prefix) {
        return Ok((*exact).to_string());
    }
    match matches.as_slice() {
        [only] => Ok((*only).to_string()),
        [] => Err(EditError::NotFound {
            kind,
            id: prefix.to_string(),
        }),
        _ => Err(EditError::Ambiguous {
            kind,
            prefix: prefix.to_string(),
            count: matches.len(),
        }),
    }
}
