// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid timestamp '{0}', expected RFC 3339 or YYYY-MM-DD")]
    Timestamp(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    Month(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,
    #[error("category is required")]
    MissingCategory,
    #[error("name is required")]
    MissingName,
    #[error("units are required")]
    MissingUnits,
    #[error("buy price is required")]
    MissingBuyPrice,
    #[error("amount invested is required")]
    MissingAmountInvested,
    #[error("current value is required")]
    MissingCurrentValue,
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },
    #[error("{field} exceeds the limit of {max} (got {value})", max = MAX_AMOUNT)]
    TooLarge { field: &'static str, value: Decimal },
}

/// Largest accepted magnitude for any amount, unit count or price (10^12).
/// Keeps every sum and product the ledger and portfolio compute far from
/// the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// A persisted record that can be checked after loading.
pub trait Record {
    fn id(&self) -> &str;

    /// Magnitude limits only; stored data is otherwise taken as-is.
    fn check(&self) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Some(TransactionType::Income),
            "expense" | "out" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction category. The known members mirror the suggestion lists;
/// anything else is kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Salary,
    Freelance,
    Investments,
    Gift,
    SiblingContribution,
    FoodAndDining,
    Breakfast,
    Brunch,
    Dinner,
    Groceries,
    Transport,
    Fuel,
    PublicTransit,
    BillsAndUtilities,
    PhoneBill,
    Insurance,
    RentOrMortgage,
    Personal,
    Parents,
    Shopping,
    Saving,
    Health,
    Entertainment,
    Other,
    Custom(String),
}

pub const INCOME_CATEGORIES: &[Category] = &[
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Gift,
    Category::SiblingContribution,
    Category::Other,
];

pub const EXPENSE_CATEGORIES: &[Category] = &[
    Category::FoodAndDining,
    Category::Breakfast,
    Category::Brunch,
    Category::Dinner,
    Category::Groceries,
    Category::Transport,
    Category::Fuel,
    Category::PublicTransit,
    Category::BillsAndUtilities,
    Category::PhoneBill,
    Category::Insurance,
    Category::RentOrMortgage,
    Category::Personal,
    Category::Parents,
    Category::Shopping,
    Category::Saving,
    Category::Health,
    Category::Entertainment,
    Category::Other,
];

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
            Category::Gift => "Gift",
            Category::SiblingContribution => "Sibling Contribution",
            Category::FoodAndDining => "Food & Dining",
            Category::Breakfast => "Breakfast",
            Category::Brunch => "Brunch",
            Category::Dinner => "Dinner",
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::Fuel => "Fuel",
            Category::PublicTransit => "Public Transit",
            Category::BillsAndUtilities => "Bills & Utilities",
            Category::PhoneBill => "Phone Bill",
            Category::Insurance => "Insurance",
            Category::RentOrMortgage => "Rent/Mortgage",
            Category::Personal => "Personal",
            Category::Parents => "Parents",
            Category::Shopping => "Shopping",
            Category::Saving => "Saving",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
            Category::Custom(s) => s,
        }
    }

    /// Shared household ledger membership. Everything else is personal.
    pub fn is_parent_related(&self) -> bool {
        matches!(self, Category::Parents | Category::SiblingContribution)
    }

    /// Resolves a label against the known members (case-insensitive),
    /// falling back to `Custom` with the trimmed input.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        INCOME_CATEGORIES
            .iter()
            .chain(EXPENSE_CATEGORIES)
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Category::Custom(trimmed.to_string()))
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from_label(&s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// ISO-8601 text exactly as persisted.
    pub date: String,
}

impl Transaction {
    pub fn timestamp(&self) -> Result<NaiveDateTime, DateError> {
        parse_timestamp(&self.date)
    }

    pub fn is_parent_related(&self) -> bool {
        self.category.is_parent_related()
    }

    /// Signed contribution to a running balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Accepts RFC 3339 (wall clock in the recorded offset), a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, or a bare `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DateError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(DateError::Timestamp(raw.to_string()))
}

/// Midnight UTC, millisecond precision: `2024-03-05T00:00:00.000Z`.
pub fn format_timestamp(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub units: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    pub buy_date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub dividend_date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub dividend_amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: String,
    pub name: String,
    pub buy_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_invested: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
}

// Form inputs leave an empty string behind when the optional date is unset.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Unvalidated transaction input.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Option<Decimal>,
    pub kind: TransactionType,
    pub category: Option<String>,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    pub fn validate(self, id: String, today: NaiveDate) -> Result<Transaction, ValidationError> {
        let amount = self.amount.ok_or(ValidationError::MissingAmount)?;
        in_range("amount", amount)?;
        let category = required_text(self.category).ok_or(ValidationError::MissingCategory)?;
        Ok(Transaction {
            id,
            amount,
            kind: self.kind,
            category: Category::from_label(&category),
            note: required_text(self.note),
            date: format_timestamp(self.date.unwrap_or(today)),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewShare {
    pub name: Option<String>,
    pub code: Option<String>,
    pub units: Option<Decimal>,
    pub buy_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub buy_date: Option<NaiveDate>,
    pub dividend_date: Option<NaiveDate>,
    pub dividend_amount: Option<Decimal>,
}

impl NewShare {
    pub fn validate(self, id: String, today: NaiveDate) -> Result<Share, ValidationError> {
        let name = required_text(self.name).ok_or(ValidationError::MissingName)?;
        let units = self.units.ok_or(ValidationError::MissingUnits)?;
        let buy_price = self.buy_price.ok_or(ValidationError::MissingBuyPrice)?;
        let current_price = self.current_price.unwrap_or(buy_price);
        in_range("units", units)?;
        in_range("buy price", buy_price)?;
        in_range("current price", current_price)?;
        if let Some(d) = self.dividend_amount {
            in_range("dividend amount", d)?;
        }
        Ok(Share {
            id,
            name,
            code: required_text(self.code)
                .map(|c| c.to_uppercase())
                .unwrap_or_default(),
            units,
            buy_price,
            current_price,
            buy_date: self.buy_date.unwrap_or(today),
            dividend_date: self.dividend_date,
            dividend_amount: self.dividend_amount,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewFund {
    pub name: Option<String>,
    pub amount_invested: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub buy_date: Option<NaiveDate>,
}

impl NewFund {
    pub fn validate(self, id: String, today: NaiveDate) -> Result<Fund, ValidationError> {
        let name = required_text(self.name).ok_or(ValidationError::MissingName)?;
        let amount_invested = self
            .amount_invested
            .ok_or(ValidationError::MissingAmountInvested)?;
        let current_value = self
            .current_value
            .ok_or(ValidationError::MissingCurrentValue)?;
        in_range("amount invested", amount_invested)?;
        in_range("current value", current_value)?;
        Ok(Fund {
            id,
            name,
            buy_date: self.buy_date.unwrap_or(today),
            amount_invested,
            current_value,
        })
    }
}

fn required_text(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn in_range(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative { field, value });
    }
    within_limit(field, value)
}

fn within_limit(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.abs() > MAX_AMOUNT {
        return Err(ValidationError::TooLarge { field, value });
    }
    Ok(())
}

impl Record for Transaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), ValidationError> {
        within_limit("amount", self.amount)
    }
}

impl Record for Share {
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), ValidationError> {
        within_limit("units", self.units)?;
        within_limit("buy price", self.buy_price)?;
        within_limit("current price", self.current_price)?;
        if let Some(d) = self.dividend_amount {
            within_limit("dividend amount", d)?;
        }
        Ok(())
    }
}

impl Record for Fund {
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), ValidationError> {
        within_limit("amount invested", self.amount_invested)?;
        within_limit("current value", self.current_value)
    }
}
