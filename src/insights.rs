// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Natural-language spending summaries from a generative language model.
//!
//! The generator never fails loudly: missing credentials, an empty month
//! and remote failures each map to their own user-facing message through
//! [`InsightGenerator::render`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::models::{Category, DateError, Transaction, TransactionType};
use crate::utils::http_client;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const NOT_CONFIGURED_MESSAGE: &str =
    "API key not configured. Set GEMINI_API_KEY (or API_KEY) to enable AI insights.";
const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found for this period to analyze.";
const FAILURE_MESSAGE: &str =
    "Sorry, I encountered an error analyzing your data. Please try again later.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not encode transactions: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("response contained no generated text")]
    EmptyResponse,
}

/// Transaction payload sent to the model: no id, date without time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedTransaction {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SimplifiedTransaction {
    pub fn from_transaction(t: &Transaction) -> Result<Self, DateError> {
        Ok(Self {
            date: t.timestamp()?.date(),
            kind: t.kind,
            category: t.category.clone(),
            amount: t.amount,
            note: t.note.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Converts what it can; undated records are logged and left out.
pub fn simplify<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<SimplifiedTransaction> {
    transactions
        .into_iter()
        .filter_map(|t| match SimplifiedTransaction::from_transaction(t) {
            Ok(s) => Some(s),
            Err(err) => {
                warn!(id = %t.id, %err, "left out of analysis");
                None
            }
        })
        .collect()
}

pub fn build_prompt(
    records: &[SimplifiedTransaction],
    month_label: &str,
) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(records)?;
    Ok(format!(
        "You are a helpful financial assistant. Analyze the following financial transactions for {month_label}.

Data:
{data}

Please provide a concise response in Markdown format including:
1. **Summary**: A brief overview of spending vs income.
2. **Key Insights**: Identify the largest spending categories or unusual patterns.
3. **Recommendations**: 3 specific, actionable tips to save money based on these specific habits.
4. **Tone**: Encouraging and professional.
"
    ))
}

pub trait LanguageModel {
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Google Generative Language `generateContent` client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LanguageModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let message: String = resp.text().unwrap_or_default().chars().take(300).collect();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: GenerateResponse = resp.json()?;
        parsed.into_text().ok_or(AnalysisError::EmptyResponse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    NotConfigured,
    NoTransactions,
    Generated(String),
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::NotConfigured => f.write_str(NOT_CONFIGURED_MESSAGE),
            Insight::NoTransactions => f.write_str(NO_TRANSACTIONS_MESSAGE),
            Insight::Generated(md) => f.write_str(md),
        }
    }
}

/// Hands out request tickets; only the newest ticket's response is kept.
#[derive(Debug, Default)]
pub struct LatestRequest {
    counter: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.counter.load(Ordering::SeqCst) == ticket.0
    }
}

pub struct InsightGenerator {
    model: Option<Box<dyn LanguageModel>>,
}

impl fmt::Debug for InsightGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightGenerator")
            .field("configured", &self.model.is_some())
            .finish()
    }
}

impl InsightGenerator {
    pub fn new(model: Option<Box<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, AnalysisError> {
        let Some(key) = cfg.api_key.as_deref() else {
            debug!("no API key configured, insights disabled");
            return Ok(Self::new(None));
        };
        let client = GeminiClient::new(key, &cfg.model, &cfg.gemini_url, cfg.http_timeout)?;
        Ok(Self::new(Some(Box::new(client))))
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Each call is independent; nothing from a previous call is retained.
    pub fn analyze(
        &self,
        records: &[SimplifiedTransaction],
        month_label: &str,
    ) -> Result<Insight, AnalysisError> {
        let Some(model) = self.model.as_deref() else {
            return Ok(Insight::NotConfigured);
        };
        if records.is_empty() {
            return Ok(Insight::NoTransactions);
        }
        let prompt = build_prompt(records, month_label)?;
        debug!(records = records.len(), month = month_label, "requesting analysis");
        let text = model.generate(&prompt)?;
        Ok(Insight::Generated(text))
    }

    /// Like [`analyze`](Self::analyze), but returns `None` when a newer
    /// request was started on `latest` before this one finished.
    pub fn analyze_latest(
        &self,
        latest: &LatestRequest,
        records: &[SimplifiedTransaction],
        month_label: &str,
    ) -> Option<Result<Insight, AnalysisError>> {
        let ticket = latest.begin();
        let result = self.analyze(records, month_label);
        if latest.is_current(ticket) {
            Some(result)
        } else {
            debug!(ticket = ticket.0, "dropping superseded analysis");
            None
        }
    }

    /// User-facing text for any outcome.
    pub fn render(result: Result<Insight, AnalysisError>) -> String {
        match result {
            Ok(insight) => insight.to_string(),
            Err(err) => {
                warn!(%err, "analysis failed");
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}
