// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;

use crate::insights::{DEFAULT_BASE_URL, DEFAULT_MODEL};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "SpendSmart", "spendsmart"));

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Absent credentials only disable insights.
    pub api_key: Option<String>,
    pub model: String,
    pub gemini_url: String,
    pub http_timeout: Duration,
    pub currency: String,
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

impl AppConfig {
    pub fn from_env(data_dir: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), data_dir)
    }

    /// `data_dir` (from the command line) wins over `SPENDSMART_DATA_DIR`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = match data_dir.or_else(|| var("SPENDSMART_DATA_DIR").map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let http_timeout = match var("SPENDSMART_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .with_context(|| {
                        format!(
                            "Invalid SPENDSMART_HTTP_TIMEOUT_SECS '{}', expected a positive number of seconds",
                            raw
                        )
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            data_dir,
            api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            model: var("SPENDSMART_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_url: var("SPENDSMART_GEMINI_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http_timeout,
            currency: var("SPENDSMART_CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| "USD".to_string()),
        })
    }
}
