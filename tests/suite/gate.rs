//! Decision-model delegation and its ledger effects.

use serde_json::{Map, json};
use vecgate_engine::{
    DecisionError, EvaluateRequest, GateRequest, GatewayError, ReverseMapRequest,
};

use crate::common::{Harness, StubDecision};

fn gate_request() -> GateRequest {
    let mut release_context = Map::new();
    release_context.insert("env".into(), json!("prod"));
    GateRequest {
        dmn_xml: "<definitions/>".into(),
        release_context,
        vector_payload: Some(vec!["v1".into(), "v2".into()]),
    }
}

#[tokio::test]
async fn gate_release_returns_and_records_decision() {
    let h = Harness::new();

    let decision = h.gateway.gate_release(&gate_request()).await.unwrap();
    assert_eq!(
        decision,
        json!({"release": true, "context_keys": 1, "vectors": 2})
    );

    let stored = h.persisted();
    assert_eq!(stored["ticks"], json!(1));
    assert_eq!(stored["events"][0]["type"], json!("gate_release"));
    assert_eq!(stored["events"][0]["payload"], decision);
}

#[tokio::test]
async fn rejected_decision_document_records_nothing() {
    let h = Harness::with_decision(StubDecision::failing(DecisionError::InvalidModel(
        "missing decision table".into(),
    )));

    let err = h.gateway.gate_release(&gate_request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Decision(_)));
    assert!(err.is_client_error());
    assert_eq!(h.decision.calls(), 1);
    assert_eq!(h.gateway.state().await.ticks(), 0);
    assert!(!h.ledger_path().exists());
}

#[tokio::test]
async fn backend_failure_is_a_server_error() {
    let h = Harness::with_decision(StubDecision::failing(DecisionError::Backend(
        "engine offline".into(),
    )));

    let err = h.gateway.gate_release(&gate_request()).await.unwrap_err();
    assert!(!err.is_client_error());
    assert_eq!(h.gateway.state().await.ticks(), 0);
}

#[tokio::test]
async fn evaluate_and_reverse_map_never_tick() {
    let h = Harness::new();

    let mut inputs = Map::new();
    inputs.insert("score".into(), json!(0.7));
    let out = h
        .gateway
        .evaluate(&EvaluateRequest {
            dmn_xml: "<definitions/>".into(),
            inputs,
        })
        .await
        .unwrap();
    assert_eq!(out, json!({"evaluated": 1}));

    let out = h
        .gateway
        .reverse_map(&ReverseMapRequest {
            dmn_xml: "<definitions/>".into(),
            inference_map_id: "map-7".into(),
            source_checkpoint: Some("cp-1".into()),
        })
        .await
        .unwrap();
    assert_eq!(out, json!({"map": "map-7", "checkpoint": "cp-1"}));

    assert_eq!(h.decision.calls(), 2);
    assert_eq!(h.gateway.state().await.ticks(), 0);
    assert!(!h.ledger_path().exists());
}
