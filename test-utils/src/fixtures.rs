//! Test fixtures with sample data.
//!
//! This module provides pre-built stock ticker events, templates, and
//! contracts for use in tests.

use chrono::{DateTime, Utc};
use msgpact_contract::{ArtifactMetadata, Contract, ExpectedMessage, Interaction, Participant};
use msgpact_matching::{MatchRule, Template};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Sample stock ticker event for testing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct StockEvent {
    /// Ticker symbol
    pub name: String,
    /// Last traded price
    pub price: f64,
    /// Time of the tick
    pub timestamp: DateTime<Utc>,
}

impl StockEvent {
    /// Create a sample Apple tick.
    #[must_use]
    pub fn apple() -> Self {
        Self {
            name: "AAPL".to_string(),
            price: 178.5,
            timestamp: Utc::now(),
        }
    }

    /// Create a sample Tesla tick.
    #[must_use]
    pub fn tesla() -> Self {
        Self {
            name: "TSLA".to_string(),
            price: 242.75,
            timestamp: Utc::now(),
        }
    }
}

/// Template for a single stock event.
///
/// Every field matches by shape rather than value, so any well formed
/// tick satisfies it.
#[must_use]
pub fn stock_event_template() -> Template {
    Template::object([
        ("Name", Template::from(MatchRule::like(json!("AAPL")))),
        ("Price", Template::from(MatchRule::decimal(178.5))),
        (
            "Timestamp",
            Template::from(MatchRule::regex(
                r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z",
                "2024-01-15T09:30:00Z",
            )),
        ),
    ])
}

/// Template for a non-empty batch of stock events.
#[must_use]
pub fn stock_batch_template() -> Template {
    Template::from(MatchRule::min_type(stock_event_template(), 1))
}

/// A two interaction contract between the stock consumer and provider.
#[must_use]
pub fn stock_contract() -> Contract {
    let single = with_stock_metadata(ExpectedMessage::new(stock_event_template()));
    let batch = with_stock_metadata(ExpectedMessage::new(stock_batch_template()));
    Contract {
        consumer: Participant::new("stock-consumer"),
        provider: Participant::new("stock-provider"),
        interactions: vec![
            Interaction::new("a single stock event", single)
                .with_provider_state("stock AAPL exists"),
            Interaction::new("some stock ticker events", batch),
        ],
        metadata: ArtifactMetadata::default(),
    }
}

fn with_stock_metadata(expected: ExpectedMessage) -> ExpectedMessage {
    expected
        .with_metadata("contentType", MatchRule::equality(json!("application/json")))
        .with_metadata("routingKey", MatchRule::like(json!("stock.updates")))
}

/// A canned artifact document as an external tool would write it.
///
/// Uses the legacy singular `providerState` key to pin read compatibility.
#[must_use]
pub fn sample_artifact() -> &'static str {
    r#"{
  "consumer": { "name": "stock-consumer" },
  "provider": { "name": "stock-provider" },
  "messages": [
    {
      "description": "a single stock event",
      "providerState": "stock AAPL exists",
      "metaData": { "contentType": "application/json" },
      "contents": { "Name": "AAPL", "Price": 178.5 },
      "matchingRules": {
        "body": {
          "$.Name": { "matchers": [ { "match": "type" } ] },
          "$.Price": { "matchers": [ { "match": "decimal" } ] }
        }
      }
    }
  ],
  "metadata": { "pactSpecification": { "version": "3.0.0" } }
}
"#
}
