//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Map, Value, json};
use tempfile::TempDir;
use vecgate_engine::{
    DecisionError, DecisionFut, DecisionModel, FuzzConfig, GatewayOrchestrator, StateLedger,
};

/// Decision model stand-in that counts calls and can be told to fail.
#[derive(Default)]
pub struct StubDecision {
    pub calls: AtomicUsize,
    pub fail_with: Option<DecisionError>,
    pub delay: Option<Duration>,
}

impl StubDecision {
    pub fn failing(err: DecisionError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<'a>(&'a self, value: Value) -> DecisionFut<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(value),
            }
        })
    }
}

impl DecisionModel for StubDecision {
    fn evaluate<'a>(&'a self, _model: &'a str, inputs: &'a Map<String, Value>) -> DecisionFut<'a> {
        self.respond(json!({ "evaluated": inputs.len() }))
    }

    fn reverse_map<'a>(
        &'a self,
        _model: &'a str,
        inference_map_id: &'a str,
        source_checkpoint: Option<&'a str>,
    ) -> DecisionFut<'a> {
        self.respond(json!({
            "map": inference_map_id,
            "checkpoint": source_checkpoint,
        }))
    }

    fn gate_release<'a>(
        &'a self,
        _model: &'a str,
        release_context: &'a Map<String, Value>,
        vector_payload: Option<&'a [String]>,
    ) -> DecisionFut<'a> {
        self.respond(json!({
            "release": true,
            "context_keys": release_context.len(),
            "vectors": vector_payload.map_or(0, <[String]>::len),
        }))
    }
}

/// A gateway over a fresh ledger in a scratch directory.
pub struct Harness {
    pub dir: TempDir,
    pub decision: Arc<StubDecision>,
    pub gateway: Arc<GatewayOrchestrator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_decision(StubDecision::default())
    }

    pub fn with_decision(decision: StubDecision) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let decision = Arc::new(decision);
        let ledger = StateLedger::open(dir.path().join("state").join("system_state.json"))
            .expect("open ledger");
        let gateway = Arc::new(GatewayOrchestrator::new(
            decision.clone(),
            ledger,
            FuzzConfig::default(),
        ));
        Self {
            dir,
            decision,
            gateway,
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.path().join("state").join("system_state.json")
    }

    /// The ledger as stored on disk.
    pub fn persisted(&self) -> Value {
        let bytes = std::fs::read(self.ledger_path()).expect("read ledger");
        serde_json::from_slice(&bytes).expect("parse ledger")
    }
}

pub fn rows(rows: &[&[f64]]) -> Vec<Vec<f64>> {
    rows.iter().map(|r| r.to_vec()).collect()
}
