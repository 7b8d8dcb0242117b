//! Fuzz runs end to end through the orchestrator.

use serde_json::json;
use vecgate_engine::{FuzzMode, FuzzRequest, GatewayError, GatewayRequest};

use crate::common::{Harness, rows};

#[tokio::test]
async fn scrub_keeps_cohesive_batch_and_drains_one_token() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(rows(&[
        &[1.0, 0.0, 0.0],
        &[0.0, 1.0, 0.0],
        &[0.0, 0.0, 1.0],
        &[1.0, 1.0, 1.0],
    ]))
    .unwrap();

    // Axis vectors average 1/(3*sqrt 3) ~ 0.192 against the rest, above 0.12.
    let resp = h.gateway.fuzz_run(&req).await.unwrap();
    assert_eq!(resp.vectors, req.vectors);
    assert_eq!(resp.consumed_tokens.len(), 1);
    assert!(resp.consumed_tokens[0].as_str().starts_with("TOK-0000-"));

    let stored = h.persisted();
    assert_eq!(stored["ticks"], json!(1));
    assert_eq!(
        stored["events"][0],
        json!({"type": "fuzz_phase", "payload": {"consumed": 1, "vectors": 4}})
    );
}

#[tokio::test]
async fn zero_vectors_are_dropped_before_cohesion() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(rows(&[&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1e-9]])).unwrap();

    let resp = h.gateway.fuzz_run(&req).await.unwrap();
    assert_eq!(resp.vectors.into_rows(), vec![vec![1.0, 0.0]]);
    assert!(resp.consumed_tokens.is_empty());
    assert_eq!(h.gateway.state().await.ticks(), 1);
}

#[tokio::test]
async fn empty_batch_still_records_a_tick() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(Vec::new()).unwrap();

    let resp = h.gateway.fuzz_run(&req).await.unwrap();
    assert!(resp.vectors.is_empty());
    assert_eq!(
        h.persisted()["events"][0]["payload"],
        json!({"consumed": 0, "vectors": 0})
    );
}

#[tokio::test]
async fn perturb_stays_within_scale_and_repeats_per_seed() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(rows(&[&[1.0, 0.9], &[0.9, 1.0], &[1.0, 1.0]]))
        .unwrap()
        .with_mode(FuzzMode::Perturb)
        .with_seed(1234)
        .with_scale(0.05);

    let first = h.gateway.fuzz_run(&req).await.unwrap();
    let second = h.gateway.fuzz_run(&req).await.unwrap();
    assert_eq!(first, second);

    for (out, inp) in first.vectors.iter().zip(req.vectors.iter()) {
        for (o, i) in out.components().iter().zip(inp.components()) {
            assert!((o - i).abs() <= 0.05 + 1e-12);
        }
    }
    assert_eq!(h.gateway.state().await.ticks(), 2);
}

#[tokio::test]
async fn unknown_mode_is_rejected_at_decode() {
    let err = serde_json::from_value::<GatewayRequest>(json!({
        "op": "fuzz_run",
        "vectors": [[1.0, 0.0]],
        "mode": "Perturb"
    }))
    .map_err(GatewayError::from)
    .unwrap_err();
    assert!(err.is_client_error());
}

#[tokio::test]
async fn huge_scale_fails_its_batch_line_only() {
    let h = Harness::new();
    let input = concat!(
        r#"{"op": "fuzz_run", "vectors": [[1.0, 0.0]], "mode": "perturb", "perturb_scale": 1e308}"#,
        "\n",
        r#"{"op": "health"}"#,
    );

    let out = vecgate_engine::run_batch(h.gateway.clone(), input).await;
    assert_eq!(out[0]["client_error"], json!(true));
    assert!(out[0]["error"].as_str().unwrap().contains("perturbation scale"));
    assert_eq!(out[1], json!({"ok": {"ok": true}}));
    assert_eq!(h.gateway.state().await.ticks(), 0);
}

#[tokio::test]
async fn invalid_scale_leaves_ledger_untouched() {
    let h = Harness::new();
    let req = FuzzRequest::from_rows(rows(&[&[1.0]]))
        .unwrap()
        .with_mode(FuzzMode::Perturb)
        .with_scale(f64::INFINITY);

    let err = h.gateway.fuzz_run(&req).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidScale(_)));
    assert_eq!(h.gateway.state().await.ticks(), 0);
    assert!(!h.ledger_path().exists());
}
