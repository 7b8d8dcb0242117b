//! Ledger durability across restarts and compaction through the gateway.

use std::sync::Arc;

use serde_json::json;
use vecgate_engine::{
    FuzzConfig, FuzzRequest, GatewayConfig, GatewayOrchestrator, NoDecisionEngine, StateLedger,
};

use crate::common::Harness;

#[tokio::test]
async fn restart_resumes_from_persisted_ticks() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(vec![vec![1.0, 0.0]]).unwrap();
    for _ in 0..3 {
        h.gateway.fuzz_run(&req).await.unwrap();
    }

    let mut config = GatewayConfig::default();
    config.ledger.path = h.ledger_path();
    let restarted = GatewayOrchestrator::from_config(&config, Arc::new(NoDecisionEngine)).unwrap();
    assert_eq!(restarted.state().await.ticks(), 3);

    restarted.fuzz_run(&req).await.unwrap();
    assert_eq!(h.persisted()["ticks"], json!(4));
}

#[tokio::test]
async fn compaction_keeps_newest_events_on_disk() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(Vec::new()).unwrap();
    for _ in 0..1001 {
        h.gateway.fuzz_run(&req).await.unwrap();
    }

    let stored = h.persisted();
    assert_eq!(stored["ticks"], json!(1001));
    assert_eq!(stored["events"].as_array().unwrap().len(), 200);
}

#[tokio::test]
async fn unknown_top_level_fields_survive_gateway_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(
        &path,
        r#"{"ticks": 10, "events": [], "deployment": "blue"}"#,
    )
    .unwrap();

    let ledger = StateLedger::open(&path).unwrap();
    let gateway = GatewayOrchestrator::new(Arc::new(NoDecisionEngine), ledger, FuzzConfig::default());
    gateway
        .fuzz_run(&FuzzRequest::from_rows(vec![vec![2.0]]).unwrap())
        .await
        .unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["ticks"], json!(11));
    assert_eq!(raw["deployment"], json!("blue"));
}

#[test]
fn corrupt_ledger_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, "not json").unwrap();

    let mut config = GatewayConfig::default();
    config.ledger.path = path;
    let err = GatewayOrchestrator::from_config(&config, Arc::new(NoDecisionEngine)).unwrap_err();
    assert!(!err.is_client_error());
}
