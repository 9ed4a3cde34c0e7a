// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use spendsmart::cli;
use spendsmart::commands::insights as insights_cmd;
use spendsmart::insights::{
    AnalysisError, GeminiClient, Insight, InsightGenerator, LanguageModel, LatestRequest,
    SimplifiedTransaction, build_prompt, simplify,
};
use spendsmart::models::{Category, Transaction, TransactionType};

struct Canned {
    reply: Result<String, ()>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl LanguageModel for Canned {
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply
            .clone()
            .map_err(|_| AnalysisError::EmptyResponse)
    }
}

fn canned(reply: Result<&str, ()>) -> (InsightGenerator, Rc<RefCell<Vec<String>>>) {
    let prompts = Rc::new(RefCell::new(Vec::new()));
    let model = Canned {
        reply: reply.map(str::to_string),
        prompts: Rc::clone(&prompts),
    };
    (InsightGenerator::new(Some(Box::new(model))), prompts)
}

fn tx(id: &str, amount: &str, kind: TransactionType, category: &str, date: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: amount.parse().unwrap(),
        kind,
        category: Category::from_label(category),
        note: Some("weekly shop".into()),
        date: date.to_string(),
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        tx("id-1", "40", TransactionType::Expense, "Groceries", "2024-03-05T00:00:00.000Z"),
        tx("id-2", "100", TransactionType::Income, "Salary", "2024-03-01T00:00:00.000Z"),
        tx("id-3", "70", TransactionType::Expense, "Parents", "2024-03-02T00:00:00.000Z"),
        tx("id-4", "9", TransactionType::Expense, "Fuel", "2024-02-27T00:00:00.000Z"),
    ]
}

#[test]
fn simplified_records_drop_id_and_time() {
    let txs = sample();
    let records = simplify(&txs);
    let v = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(
        v,
        serde_json::json!({
            "date": "2024-03-05",
            "type": "expense",
            "category": "Groceries",
            "amount": 40.0,
            "note": "weekly shop"
        })
    );
    assert!(v.get("id").is_none());
}

#[test]
fn prompt_embeds_month_and_data() {
    let records = simplify(&sample()[..1]);
    let prompt = build_prompt(&records, "March 2024").unwrap();
    assert!(prompt.contains("March 2024"));
    assert!(prompt.contains("\"date\": \"2024-03-05\""));
    assert!(prompt.contains("**Recommendations**"));
    assert!(!prompt.contains("id-1"));
}

#[test]
fn three_outcomes_have_distinct_messages() {
    let records: Vec<SimplifiedTransaction> = simplify(&sample());

    let unconfigured = InsightGenerator::new(None);
    let a = unconfigured.analyze(&records, "March 2024").unwrap();
    assert_eq!(a, Insight::NotConfigured);

    let (generator, prompts) = canned(Ok("## Summary\nAll good."));
    let b = generator.analyze(&[], "March 2024").unwrap();
    assert_eq!(b, Insight::NoTransactions);
    assert!(prompts.borrow().is_empty());

    let (failing, _) = canned(Err(()));
    let c = InsightGenerator::render(failing.analyze(&records, "March 2024"));

    let a = a.to_string();
    let b = b.to_string();
    assert!(a.contains("API key"));
    assert!(b.contains("No transactions"));
    assert!(c.contains("error"));
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

#[test]
fn generated_text_is_returned_verbatim() {
    let (generator, prompts) = canned(Ok("## Summary\nSpend less on fuel."));
    let records = simplify(&sample());
    let out = generator.analyze(&records, "March 2024").unwrap();
    assert_eq!(out, Insight::Generated("## Summary\nSpend less on fuel.".into()));

    // Independent calls: each one sends its own full prompt.
    generator.analyze(&records, "March 2024").unwrap();
    assert_eq!(prompts.borrow().len(), 2);
    assert_eq!(prompts.borrow()[0], prompts.borrow()[1]);
}

#[test]
fn command_analyzes_personal_month_only() {
    let (generator, prompts) = canned(Ok("ok"));
    let m = cli::build_cli().get_matches_from(["spendsmart", "insights", "--month", "2024-03"]);
    let Some(("insights", sub)) = m.subcommand() else {
        panic!("no insights subcommand");
    };
    let txs = sample();
    let out = insights_cmd::run(&txs, &generator, sub).unwrap();
    assert_eq!(out, "ok");
    let prompt = prompts.borrow()[0].clone();
    assert!(prompt.contains("Groceries"));
    assert!(prompt.contains("Salary"));
    assert!(!prompt.contains("Parents"));
    assert!(!prompt.contains("Fuel"));
}

struct Interrupting {
    latest: Arc<LatestRequest>,
}

impl LanguageModel for Interrupting {
    fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
        // A newer request starts while this one is in flight.
        self.latest.begin();
        Ok("stale".into())
    }
}

#[test]
fn superseded_responses_are_dropped() {
    let latest = Arc::new(LatestRequest::new());
    let records = simplify(&sample());

    let slow = InsightGenerator::new(Some(Box::new(Interrupting {
        latest: Arc::clone(&latest),
    })));
    assert!(slow.analyze_latest(&latest, &records, "March 2024").is_none());

    let (fresh, _) = canned(Ok("fresh"));
    let got = fresh
        .analyze_latest(&latest, &records, "March 2024")
        .unwrap()
        .unwrap();
    assert_eq!(got, Insight::Generated("fresh".into()));

    let first = latest.begin();
    let second = latest.begin();
    assert!(!latest.is_current(first));
    assert!(latest.is_current(second));
}

#[test]
fn gemini_endpoint_uses_model_and_base_url() {
    let client = GeminiClient::new(
        "secret",
        "gemini-2.5-flash",
        "https://example.test/",
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(
        client.endpoint(),
        "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
    );
    assert!(!format!("{:?}", client).contains("secret"));
}
