//! Decision-model capability.
//!
//! The gateway never parses or evaluates decision documents itself. It hands
//! the source document and inputs to a [`DecisionModel`] and treats whatever
//! comes back as an opaque JSON value.

use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};
use thiserror::Error;

/// Decision call future type alias.
pub type DecisionFut<'a> = Pin<Box<dyn Future<Output = Result<Value, DecisionError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// Malformed decision document or inputs that fail its schema.
    #[error("invalid decision model input: {0}")]
    InvalidModel(String),
    #[error("decision backend failed: {0}")]
    Backend(String),
}

impl DecisionError {
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, DecisionError::InvalidModel(_))
    }
}

/// External decision engine.
///
/// Implementations may be synchronous (return `Box::pin(async move { .. })`
/// around a direct call) or genuinely async. They must not touch the ledger.
pub trait DecisionModel: Send + Sync {
    fn evaluate<'a>(&'a self, model: &'a str, inputs: &'a Map<String, Value>) -> DecisionFut<'a>;

    fn reverse_map<'a>(
        &'a self,
        model: &'a str,
        inference_map_id: &'a str,
        source_checkpoint: Option<&'a str>,
    ) -> DecisionFut<'a>;

    fn gate_release<'a>(
        &'a self,
        model: &'a str,
        release_context: &'a Map<String, Value>,
        vector_payload: Option<&'a [String]>,
    ) -> DecisionFut<'a>;
}

/// Placeholder for deployments without a decision engine.
///
/// Every call fails with [`DecisionError::Backend`]; fuzz runs and ledger
/// reads are unaffected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecisionEngine;

impl NoDecisionEngine {
    const MESSAGE: &'static str = "no decision-model engine is configured";

    fn unavailable<'a>() -> DecisionFut<'a> {
        Box::pin(async { Err(DecisionError::Backend(Self::MESSAGE.to_string())) })
    }
}

impl DecisionModel for NoDecisionEngine {
    fn evaluate<'a>(&'a self, _model: &'a str, _inputs: &'a Map<String, Value>) -> DecisionFut<'a> {
        Self::unavailable()
    }

    fn reverse_map<'a>(
        &'a self,
        _model: &'a str,
        _inference_map_id: &'a str,
        _source_checkpoint: Option<&'a str>,
    ) -> DecisionFut<'a> {
        Self::unavailable()
    }

    fn gate_release<'a>(
        &'a self,
        _model: &'a str,
        _release_context: &'a Map<String, Value>,
        _vector_payload: Option<&'a [String]>,
    ) -> DecisionFut<'a> {
        Self::unavailable()
    }
}
