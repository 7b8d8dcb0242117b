//! The gateway orchestrator.
//!
//! # Concurrency
//!
//! The ledger sits behind a single async mutex. Decision-model calls and the
//! fuzz pipeline run outside it; only the tick + save of a mutating operation
//! holds the lock. Concurrent mutating requests therefore never lose a tick,
//! and the ledger is never exposed half-written.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::Mutex;
use vecgate_config::{FuzzConfig, GatewayConfig};
use vecgate_core::{Ledger, StateLedger, clean, drain, perturb, request_stream};
use vecgate_types::{EventKind, Token};

use crate::decision::DecisionModel;
use crate::error::GatewayError;
use crate::request::{
    EvaluateRequest, FuzzRequest, FuzzResponse, GateRequest, GatewayRequest, HealthResponse,
    ReverseMapRequest,
};

pub struct GatewayOrchestrator {
    decision: Arc<dyn DecisionModel>,
    ledger: Mutex<StateLedger>,
    fuzz: FuzzConfig,
}

impl std::fmt::Debug for GatewayOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayOrchestrator")
            .field("fuzz", &self.fuzz)
            .finish_non_exhaustive()
    }
}

impl GatewayOrchestrator {
    #[must_use]
    pub fn new(decision: Arc<dyn DecisionModel>, ledger: StateLedger, fuzz: FuzzConfig) -> Self {
        Self {
            decision,
            ledger: Mutex::new(ledger),
            fuzz,
        }
    }

    /// Open the configured ledger and build an orchestrator around it.
    pub fn from_config(
        config: &GatewayConfig,
        decision: Arc<dyn DecisionModel>,
    ) -> Result<Self, GatewayError> {
        let ledger = StateLedger::open(&config.ledger.path)?;
        tracing::info!(
            path = %config.ledger.path.display(),
            ticks = ledger.ledger().ticks(),
            "Gateway ready"
        );
        Ok(Self::new(decision, ledger, config.fuzz.clone()))
    }

    #[must_use]
    pub fn health(&self) -> HealthResponse {
        HealthResponse { ok: true }
    }

    /// Snapshot of the ledger as of the last committed tick.
    pub async fn state(&self) -> Ledger {
        self.ledger.lock().await.ledger().clone()
    }

    /// Evaluate a decision model. Never touches the ledger.
    pub async fn evaluate(&self, req: &EvaluateRequest) -> Result<Value, GatewayError> {
        let result = self.decision.evaluate(&req.dmn_xml, &req.inputs).await?;
        tracing::debug!("Decision evaluated");
        Ok(result)
    }

    /// Trace an inference map back to its sources. Never touches the ledger.
    pub async fn reverse_map(&self, req: &ReverseMapRequest) -> Result<Value, GatewayError> {
        let result = self
            .decision
            .reverse_map(
                &req.dmn_xml,
                &req.inference_map_id,
                req.source_checkpoint.as_deref(),
            )
            .await?;
        tracing::debug!(map = %req.inference_map_id, "Reverse map resolved");
        Ok(result)
    }

    /// Obtain a release decision and record it.
    ///
    /// If the decision call fails nothing is recorded.
    pub async fn gate_release(&self, req: &GateRequest) -> Result<Value, GatewayError> {
        let decision = self
            .decision
            .gate_release(
                &req.dmn_xml,
                &req.release_context,
                req.vector_payload.as_deref(),
            )
            .await?;

        let ticks = self
            .ledger
            .lock()
            .await
            .commit(EventKind::GateRelease.as_str(), decision.clone())?;
        tracing::info!(ticks, "Gate release recorded");
        Ok(decision)
    }

    /// Filter, optionally perturb, optionally drain tokens, then record one
    /// `fuzz_phase` tick.
    pub async fn fuzz_run(&self, req: &FuzzRequest) -> Result<FuzzResponse, GatewayError> {
        let threshold = req.cosine_threshold.unwrap_or(self.fuzz.cosine_threshold);
        if !threshold.is_finite() {
            return Err(GatewayError::InvalidRequest(format!(
                "cosine_threshold must be finite (got {threshold})"
            )));
        }

        let mut vectors = clean(&req.vectors, threshold);
        if req.mode.perturbs() {
            let scale = req.perturb_scale.unwrap_or(self.fuzz.perturb_scale);
            let mut stream = request_stream(req.seed.unwrap_or(self.fuzz.seed));
            vectors = perturb(&vectors, scale, &mut stream)?;
        }
        let consumed_tokens: Vec<Token> = if req.consume_tokens {
            drain(&vectors)
        } else {
            Vec::new()
        };

        let payload = json!({
            "consumed": consumed_tokens.len(),
            "vectors": vectors.len(),
        });
        let ticks = self
            .ledger
            .lock()
            .await
            .commit(EventKind::FuzzPhase.as_str(), payload)?;

        tracing::info!(
            mode = %req.mode,
            input = req.vectors.len(),
            kept = vectors.len(),
            consumed = consumed_tokens.len(),
            ticks,
            "Fuzz run recorded"
        );
        Ok(FuzzResponse {
            vectors,
            consumed_tokens,
        })
    }

    /// Run any operation and render its result as JSON.
    pub async fn dispatch(&self, req: GatewayRequest) -> Result<Value, GatewayError> {
        tracing::debug!(op = req.op(), "Dispatching request");
        match req {
            GatewayRequest::Health => Ok(serde_json::to_value(self.health())?),
            GatewayRequest::State => Ok(serde_json::to_value(self.state().await)?),
            GatewayRequest::Evaluate(r) => self.evaluate(&r).await,
            GatewayRequest::ReverseMap(r) => self.reverse_map(&r).await,
            GatewayRequest::GateRelease(r) => self.gate_release(&r).await,
            GatewayRequest::FuzzRun(r) => Ok(serde_json::to_value(self.fuzz_run(&r).await?)?),
        }
    }
}
