//! Request and response shapes for gateway operations.
//!
//! Field names follow the gateway's JSON contract (`dmn_xml`,
//! `cosine_threshold`, `consumed_tokens`, ...), so these types can be decoded
//! straight from a transport body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vecgate_types::{FuzzMode, Token, VectorBatch, VectorError};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub dmn_xml: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseMapRequest {
    pub dmn_xml: String,
    pub inference_map_id: String,
    #[serde(default)]
    pub source_checkpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRequest {
    pub dmn_xml: String,
    #[serde(default)]
    pub release_context: Map<String, Value>,
    #[serde(default)]
    pub vector_payload: Option<Vec<String>>,
}

/// A fuzz run. Unset optional fields fall back to the gateway's configured
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzRequest {
    pub vectors: VectorBatch,
    #[serde(default)]
    pub mode: FuzzMode,
    #[serde(default)]
    pub cosine_threshold: Option<f64>,
    #[serde(default = "default_true")]
    pub consume_tokens: bool,
    /// Seed for this request's perturbation stream.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub perturb_scale: Option<f64>,
}

impl FuzzRequest {
    #[must_use]
    pub fn new(vectors: VectorBatch) -> Self {
        Self {
            vectors,
            mode: FuzzMode::Scrub,
            cosine_threshold: None,
            consume_tokens: true,
            seed: None,
            perturb_scale: None,
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, VectorError> {
        Ok(Self::new(VectorBatch::from_rows(rows)?))
    }

    #[must_use]
    pub fn with_mode(mut self, mode: FuzzMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.cosine_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, consume: bool) -> Self {
        self.consume_tokens = consume;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.perturb_scale = Some(scale);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzResponse {
    pub vectors: VectorBatch,
    pub consumed_tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Any gateway operation, tagged by `op`.
///
/// ```json
/// {"op": "fuzz_run", "vectors": [[1, 0], [0, 1]], "mode": "perturb"}
/// {"op": "state"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GatewayRequest {
    Health,
    State,
    Evaluate(EvaluateRequest),
    ReverseMap(ReverseMapRequest),
    GateRelease(GateRequest),
    FuzzRun(FuzzRequest),
}

impl GatewayRequest {
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            GatewayRequest::Health => "health",
            GatewayRequest::State => "state",
            GatewayRequest::Evaluate(_) => "evaluate",
            GatewayRequest::ReverseMap(_) => "reverse_map",
            GatewayRequest::GateRelease(_) => "gate_release",
            GatewayRequest::FuzzRun(_) => "fuzz_run",
        }
    }
}
