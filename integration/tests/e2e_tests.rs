//! End-to-end tests for the message contract workflow.
//!
//! Each test drives both halves of the loop: the consumer records the
//! messages it can handle and writes the pact artifact, then the provider
//! replays real triggers against that artifact and reports per-interaction
//! outcomes.

use msgpact_consumer::{MessagePactBuilder, PactConfig};
use msgpact_contract::Contract;
use msgpact_matching::MatchRule;
use msgpact_verifier::{
    ArtifactSource, CapturingSender, InteractionOutcome, MessageVerifier, ProducedMessage,
    ScenarioRegistry, VerifierError,
};
use proptest::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use test_utils::fixtures::{self, StockEvent};
use test_utils::logging::{init_test_tracing, LoggingConfig};
use test_utils::mocks::{FailingSender, MockStockFeed};
use tokio::sync::watch;

/// Record the stock contract into `dir` and return the artifact path.
fn record_stock_pact(dir: &TempDir) -> PathBuf {
    init_test_tracing(&LoggingConfig::default());
    let mut pact = MessagePactBuilder::new("stock-consumer", "stock-provider")
        .with_config(PactConfig::new().with_pact_dir(dir.path()));

    pact.expects_to_receive("a single stock event")
        .given("stock AAPL exists")
        .with_metadata("contentType", "application/json")
        .with_metadata("routingKey", MatchRule::like(json!("stock.updates")))
        .with_content(fixtures::stock_event_template())
        .verify(|event: StockEvent| {
            if event.price > 0.0 {
                Ok(())
            } else {
                Err(format!("non-positive price {}", event.price))
            }
        })
        .unwrap();

    pact.expects_to_receive("some stock ticker events")
        .with_content(fixtures::stock_batch_template())
        .record()
        .unwrap();

    pact.write_pact().unwrap()
}

fn single_event_message() -> anyhow::Result<ProducedMessage> {
    Ok(ProducedMessage::from_serialize(&StockEvent::apple())?
        .with_metadata("contentType", "application/json")
        .with_metadata("routingKey", "stock.live"))
}

#[tokio::test]
async fn test_full_contract_loop() {
    let dir = TempDir::new().unwrap();
    let path = record_stock_pact(&dir);

    let mut registry = ScenarioRegistry::new();
    registry
        .register("a single stock event", || async { single_event_message() })
        .unwrap();
    registry
        .register("some stock ticker events", || async {
            Ok(vec![
                ProducedMessage::from_serialize(&StockEvent::apple())?,
                ProducedMessage::from_serialize(&StockEvent::tesla())?,
            ])
        })
        .unwrap();

    let verifier = MessageVerifier::new(registry);
    let source = ArtifactSource::File(path);
    let report = verifier.verify(&source).await.unwrap();

    assert!(report.success(), "{}", report.render());

    let rerun = verifier.verify(&source).await.unwrap();
    assert_eq!(rerun, report);

    let report = report.ensure_passed().unwrap();
    assert_eq!(report.passed_count(), 2);
}

#[tokio::test]
async fn test_partially_registered_provider_reports_every_interaction() {
    let dir = TempDir::new().unwrap();
    let path = record_stock_pact(&dir);

    let mut registry = ScenarioRegistry::new();
    registry
        .register("a single stock event", || async { single_event_message() })
        .unwrap();

    let report = MessageVerifier::new(registry)
        .verify(&ArtifactSource::File(path))
        .await
        .unwrap();

    assert!(!report.success());
    assert_eq!(report.results.len(), 2);
    assert!(report.results[0].outcome.passed());
    let InteractionOutcome::Fail { mismatches } = &report.results[1].outcome else {
        panic!("expected failure");
    };
    assert!(mismatches[0]
        .reason
        .contains("No scenario registered for description"));

    let err = report.ensure_passed().unwrap_err();
    assert!(matches!(
        err,
        VerifierError::VerificationFailed {
            failed: 1,
            total: 2
        }
    ));
}

#[tokio::test]
async fn test_artifact_records_matching_rules() {
    let dir = TempDir::new().unwrap();
    let path = record_stock_pact(&dir);

    let text = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(
        doc.pointer("/messages/0/matchingRules/body/$.Name/matchers/0/match"),
        Some(&json!("type"))
    );
    assert_eq!(
        doc.pointer("/messages/0/providerStates/0/name"),
        Some(&json!("stock AAPL exists"))
    );
    assert_eq!(
        doc.pointer("/messages/1/matchingRules/body/$/matchers/0/min"),
        Some(&json!(1))
    );
    assert_eq!(
        doc.pointer("/metadata/pactSpecification/version"),
        Some(&json!("3.0.0"))
    );
}

#[tokio::test]
async fn test_divergent_provider_reports_paths() {
    let dir = TempDir::new().unwrap();
    let path = record_stock_pact(&dir);

    let mut registry = ScenarioRegistry::new();
    registry
        .register_sync("a single stock event", || {
            Ok(ProducedMessage::new(json!({
                "Name": 42,
                "Price": 178.5,
                "Timestamp": "2024-01-15T09:30:00Z"
            }))
            .with_metadata("contentType", "application/json")
            .with_metadata("routingKey", "stock.live"))
        })
        .unwrap();
    registry
        .register_sync("some stock ticker events", || {
            Ok(Vec::<ProducedMessage>::new())
        })
        .unwrap();

    let report = MessageVerifier::new(registry)
        .verify(&ArtifactSource::File(path))
        .await
        .unwrap();
    assert!(!report.success());
    assert_eq!(report.failed_count(), 2);

    let InteractionOutcome::Fail { mismatches } = &report.results[0].outcome else {
        panic!("expected failure");
    };
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].path, "$.Name");
    assert_eq!(
        mismatches[0].reason,
        "type mismatch: expected string, got number"
    );

    let InteractionOutcome::Fail { mismatches } = &report.results[1].outcome else {
        panic!("expected failure");
    };
    assert_eq!(mismatches[0].path, "$");
    assert_eq!(mismatches[0].reason, "array length 0 < required 1");

    let err = report.ensure_passed().unwrap_err();
    assert!(matches!(
        err,
        VerifierError::VerificationFailed {
            failed: 2,
            total: 2
        }
    ));
}

#[tokio::test]
async fn test_unknown_matcher_falls_back_to_equality() {
    let doc = json!({
        "consumer": {"name": "stock-consumer"},
        "provider": {"name": "stock-provider"},
        "messages": [{
            "description": "a dated event",
            "contents": {"Date": "2024-01-15"},
            "matchingRules": {
                "body": {
                    "$.Date": {"matchers": [{"match": "date", "format": "yyyy-MM-dd"}]}
                }
            }
        }],
        "metadata": {"pactSpecification": {"version": "3.0.0"}}
    });
    let source = ArtifactSource::Inline(doc.to_string());

    let mut registry = ScenarioRegistry::new();
    registry
        .register_sync("a dated event", || {
            Ok(ProducedMessage::new(json!({"Date": "2024-01-15"})))
        })
        .unwrap();
    let report = MessageVerifier::new(registry).verify(&source).await.unwrap();
    assert!(report.success(), "{}", report.render());

    let mut registry = ScenarioRegistry::new();
    registry
        .register_sync("a dated event", || {
            Ok(ProducedMessage::new(json!({"Date": "2025-02-20"})))
        })
        .unwrap();
    let report = MessageVerifier::new(registry).verify(&source).await.unwrap();
    let InteractionOutcome::Fail { mismatches } = &report.results[0].outcome else {
        panic!("expected failure");
    };
    assert_eq!(mismatches[0].path, "$.Date");
    assert_eq!(mismatches[0].reason, "value mismatch");
}

#[test]
fn test_handler_rejection_blocks_publication() {
    let dir = TempDir::new().unwrap();
    let mut pact = MessagePactBuilder::new("stock-consumer", "stock-provider")
        .with_config(PactConfig::new().with_pact_dir(dir.path()));

    let err = pact
        .expects_to_receive("a single stock event")
        .with_content(fixtures::stock_event_template())
        .verify(|event: StockEvent| Err::<(), _>(format!("cannot handle {}", event.name)))
        .unwrap_err();
    assert!(err.to_string().contains("cannot handle AAPL"));

    pact.write_pact().unwrap();
    let written = std::fs::read_to_string(
        dir.path().join("stock-consumer-stock-provider.json"),
    )
    .unwrap();
    let contract = Contract::from_artifact_str(&written).unwrap();
    assert!(contract.interactions.is_empty());
}

#[test]
fn test_pact_files_are_byte_stable_across_builders() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let first = std::fs::read(record_stock_pact(&first_dir)).unwrap();
    let second = std::fs::read(record_stock_pact(&second_dir)).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_captured_traffic_feeds_verification() {
    let dir = TempDir::new().unwrap();
    let mut pact = MessagePactBuilder::new("stock-consumer", "stock-provider")
        .with_config(PactConfig::new().with_pact_dir(dir.path()));
    pact.expects_to_receive("some stock ticker events")
        .with_content(fixtures::stock_batch_template())
        .record()
        .unwrap();
    let path = pact.write_pact().unwrap();

    let feed = MockStockFeed::with_events(vec![StockEvent::apple(), StockEvent::tesla()]);
    let sender = CapturingSender::new();
    feed.publish_to(&sender).await.unwrap();
    let captured = sender.take_messages().await.unwrap();
    assert_eq!(captured.len(), 2);

    let mut registry = ScenarioRegistry::new();
    registry
        .register_sync("some stock ticker events", move || Ok(captured.clone()))
        .unwrap();

    let report = MessageVerifier::new(registry)
        .verify(&ArtifactSource::File(path))
        .await
        .unwrap();
    assert!(report.success(), "{}", report.render());
}

#[tokio::test]
async fn test_send_failure_surfaces_as_trigger_error() {
    let dir = TempDir::new().unwrap();
    let mut pact = MessagePactBuilder::new("stock-consumer", "stock-provider")
        .with_config(PactConfig::new().with_pact_dir(dir.path()));
    pact.expects_to_receive("a single stock event")
        .with_content(fixtures::stock_event_template())
        .record()
        .unwrap();
    let path = pact.write_pact().unwrap();

    let feed = Arc::new(MockStockFeed::with_events(vec![StockEvent::apple()]));
    let sender = FailingSender::new("broker unavailable");
    let mut registry = ScenarioRegistry::new();
    registry
        .register("a single stock event", move || {
            let feed = Arc::clone(&feed);
            let sender = sender.clone();
            async move {
                feed.publish_to(&sender).await?;
                single_event_message()
            }
        })
        .unwrap();

    let report = MessageVerifier::new(registry)
        .verify(&ArtifactSource::File(path))
        .await
        .unwrap();

    assert!(!report.success());
    let InteractionOutcome::Fail { mismatches } = &report.results[0].outcome else {
        panic!("expected failure");
    };
    assert!(mismatches[0].reason.starts_with("trigger execution failed"));
    assert!(mismatches[0].reason.contains("broker unavailable"));
}

#[tokio::test]
async fn test_cancellation_surfaces_completed_work() {
    let source = ArtifactSource::Inline(
        fixtures::stock_contract().to_artifact_string().unwrap(),
    );

    let (tx, rx) = watch::channel(false);
    let tx = Arc::new(tx);
    let mut registry = ScenarioRegistry::new();
    let cancel_after_first = Arc::clone(&tx);
    registry
        .register("a single stock event", move || {
            let cancel = Arc::clone(&cancel_after_first);
            async move {
                tracing::debug!("requesting cancellation mid-run");
                let _ = cancel.send(true);
                Ok(ProducedMessage::from_serialize(&StockEvent::apple())?
                    .with_metadata("contentType", "application/json")
                    .with_metadata("routingKey", "stock.updates"))
            }
        })
        .unwrap();
    registry
        .register_sync("some stock ticker events", || {
            Ok(Vec::<ProducedMessage>::new())
        })
        .unwrap();

    let report = MessageVerifier::new(registry)
        .with_cancellation(rx)
        .verify(&source)
        .await
        .unwrap();
    assert!(report.cancelled);
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].outcome.passed(), "{}", report.render());

    let err = report.ensure_passed().unwrap_err();
    assert!(matches!(err, VerifierError::Cancelled { completed: 1 }));
}

#[tokio::test]
async fn test_canned_artifact_from_other_tooling_verifies() {
    let mut registry = ScenarioRegistry::new();
    registry
        .register_sync("a single stock event", || {
            Ok(
                ProducedMessage::new(json!({"Name": "MSFT", "Price": 310.25}))
                    .with_metadata("contentType", "application/json"),
            )
        })
        .unwrap();

    let report = MessageVerifier::new(registry)
        .verify(&ArtifactSource::Inline(
            fixtures::sample_artifact().to_string(),
        ))
        .await
        .unwrap();
    assert!(report.success(), "{}", report.render());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_recorded_contracts_verify_against_example_replay(
        description in test_utils::interaction_description_strategy(),
        template in test_utils::template_strategy(),
    ) {
        let dir = TempDir::new().unwrap();
        let mut pact = MessagePactBuilder::new("stock-consumer", "stock-provider")
            .with_config(PactConfig::new().with_pact_dir(dir.path()));
        pact.expects_to_receive(&description)
            .with_content(template.clone())
            .record()
            .unwrap();
        let path = pact.write_pact().unwrap();

        let example = template.example();
        let mut registry = ScenarioRegistry::new();
        registry
            .register_sync(&description, move || {
                Ok(ProducedMessage::new(example.clone()))
            })
            .unwrap();

        let report = tokio_test::block_on(
            MessageVerifier::new(registry).verify(&ArtifactSource::File(path)),
        )
        .unwrap();
        prop_assert!(report.success(), "{}", report.render());
    }

    #[test]
    fn prop_on_disk_round_trip_preserves_contract(
        descriptions in prop::collection::btree_set("[a-z][a-z0-9 ]{0,14}", 1..4),
        template in test_utils::template_strategy(),
        metadata in test_utils::metadata_strategy(),
    ) {
        let dir = TempDir::new().unwrap();
        let mut pact = MessagePactBuilder::new("stock-consumer", "stock-provider")
            .with_config(PactConfig::new().with_pact_dir(dir.path()));
        for description in &descriptions {
            let mut builder = pact.expects_to_receive(description);
            for (key, value) in &metadata {
                builder = builder.with_metadata(key, value.clone());
            }
            builder.with_content(template.clone()).record().unwrap();
        }
        let path = pact.write_pact().unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let parsed = Contract::from_artifact_str(&text).unwrap();
        prop_assert_eq!(&parsed, pact.contract());
    }
}
