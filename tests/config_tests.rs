// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use spendsmart::config::AppConfig;
use spendsmart::insights::{DEFAULT_BASE_URL, DEFAULT_MODEL, InsightGenerator};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_unset() {
    let cfg = AppConfig::from_lookup(env(&[]), Some(PathBuf::from("/tmp/ss"))).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/tmp/ss"));
    assert_eq!(cfg.api_key, None);
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.gemini_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    assert_eq!(cfg.currency, "USD");
    assert!(!InsightGenerator::from_config(&cfg).unwrap().is_configured());
}

#[test]
fn api_key_falls_back_and_blank_is_unset() {
    let cfg = AppConfig::from_lookup(
        env(&[("GEMINI_API_KEY", "  "), ("API_KEY", "k-123")]),
        Some(PathBuf::from("/tmp/ss")),
    )
    .unwrap();
    assert_eq!(cfg.api_key.as_deref(), Some("k-123"));
    assert!(InsightGenerator::from_config(&cfg).unwrap().is_configured());

    let cfg = AppConfig::from_lookup(
        env(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "k-123")]),
        Some(PathBuf::from("/tmp/ss")),
    )
    .unwrap();
    assert_eq!(cfg.api_key.as_deref(), Some("primary"));
}

#[test]
fn overrides_and_cli_data_dir_precedence() {
    let lookup = env(&[
        ("SPENDSMART_DATA_DIR", "/from/env"),
        ("SPENDSMART_MODEL", "gemini-pro"),
        ("SPENDSMART_HTTP_TIMEOUT_SECS", "5"),
        ("SPENDSMART_CURRENCY", "inr"),
    ]);
    let cfg = AppConfig::from_lookup(&lookup, None).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/from/env"));
    assert_eq!(cfg.model, "gemini-pro");
    assert_eq!(cfg.http_timeout, Duration::from_secs(5));
    assert_eq!(cfg.currency, "INR");

    let cfg = AppConfig::from_lookup(&lookup, Some(PathBuf::from("/from/cli"))).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/from/cli"));
}

#[test]
fn bad_timeout_is_an_error() {
    let err = AppConfig::from_lookup(
        env(&[("SPENDSMART_HTTP_TIMEOUT_SECS", "soon")]),
        Some(PathBuf::from("/tmp/ss")),
    )
    .unwrap_err();
    assert!(err.to_string().contains("SPENDSMART_HTTP_TIMEOUT_SECS"));
}

#[test]
fn zero_timeout_is_an_error() {
    let err = AppConfig::from_lookup(
        env(&[("SPENDSMART_HTTP_TIMEOUT_SECS", "0")]),
        Some(PathBuf::from("/tmp/ss")),
    )
    .unwrap_err();
    assert!(err.to_string().contains("positive number of seconds"));
}
