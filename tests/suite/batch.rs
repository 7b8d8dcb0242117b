//! JSON-lines batch execution.

use serde_json::json;
use vecgate_engine::run_batch;

use crate::common::Harness;

#[tokio::test]
async fn batch_answers_every_line_in_order() {
    let h = Harness::new();
    let input = [
        r#"{"op": "health"}"#,
        r#"{"op": "gate_release", "dmn_xml": "<d/>", "release_context": {"a": 1}}"#,
        r#"{"op": "fuzz_run", "vectors": [[1.0, 0.0], [0.0, 1.0]], "consume_tokens": false}"#,
        r#"{"op": "launch"}"#,
        r#"{"op": "reverse_map", "dmn_xml": "<d/>", "inference_map_id": "m"}"#,
    ]
    .join("\n");

    let out = run_batch(h.gateway.clone(), &input).await;
    assert_eq!(out.len(), 5);
    assert_eq!(out[0], json!({"ok": {"ok": true}}));
    assert_eq!(out[1]["ok"]["release"], json!(true));
    assert_eq!(out[2]["ok"]["consumed_tokens"], json!([]));
    assert_eq!(out[3]["client_error"], json!(true));
    assert_eq!(out[4]["ok"]["map"], json!("m"));

    // Only gate_release and fuzz_run tick.
    assert_eq!(h.gateway.state().await.ticks(), 2);
}

#[tokio::test]
async fn malformed_vectors_fail_only_their_line() {
    let h = Harness::new();
    let input = concat!(
        r#"{"op": "fuzz_run", "vectors": [[1.0, 2.0], [1.0]]}"#,
        "\n",
        r#"{"op": "state"}"#,
    );

    let out = run_batch(h.gateway.clone(), input).await;
    assert_eq!(out[0]["client_error"], json!(true));
    assert_eq!(out[1]["ok"]["ticks"], json!(0));
}
