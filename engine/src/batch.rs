//! JSON-lines batch execution.
//!
//! Every non-blank line is one [`GatewayRequest`]. Requests run concurrently on
//! the current runtime; responses come back in input order, one envelope per
//! request:
//!
//! ```json
//! {"ok": <result>}
//! {"error": "<message>", "client_error": true}
//! ```

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::task::JoinSet;

use crate::error::GatewayError;
use crate::gateway::GatewayOrchestrator;
use crate::request::GatewayRequest;

/// Wrap an operation result in the batch response envelope.
#[must_use]
pub fn envelope(result: Result<Value, GatewayError>) -> Value {
    match result {
        Ok(value) => json!({ "ok": value }),
        Err(e) => json!({
            "error": e.to_string(),
            "client_error": e.is_client_error(),
        }),
    }
}

/// Decode one batch line.
pub fn decode_line(line: &str) -> Result<GatewayRequest, GatewayError> {
    Ok(serde_json::from_str(line)?)
}

/// Run every request in `input` and return the envelopes in input order.
pub async fn run_batch(gateway: Arc<GatewayOrchestrator>, input: &str) -> Vec<Value> {
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut slots: Vec<Option<Value>> = vec![None; lines.len()];
    let mut tasks = JoinSet::new();

    for (idx, line) in lines.iter().enumerate() {
        match decode_line(line) {
            Ok(req) => {
                let gateway = Arc::clone(&gateway);
                tasks.spawn(async move { (idx, gateway.dispatch(req).await) });
            }
            Err(e) => {
                tracing::warn!(line = idx + 1, "Rejected batch line: {e}");
                slots[idx] = Some(envelope(Err(e)));
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = Some(envelope(result)),
            Err(e) => tracing::error!("Batch task failed: {e}"),
        }
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                json!({ "error": "request aborted", "client_error": false })
            })
        })
        .collect()
}
