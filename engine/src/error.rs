use thiserror::Error;
use vecgate_core::{InvalidScale, LedgerError};
use vecgate_types::VectorError;

use crate::decision::DecisionError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Decision(#[from] DecisionError),
    /// Request that could not be decoded or fails a parameter check.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    InvalidVectors(#[from] VectorError),
    #[error(transparent)]
    InvalidScale(#[from] InvalidScale),
    /// The ledger could not be read or persisted. For mutating operations the
    /// effect is unknown to the caller and it should reread state.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl GatewayError {
    /// True when the caller sent something the gateway will never accept.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            GatewayError::Decision(e) => e.is_client_error(),
            GatewayError::InvalidRequest(_)
            | GatewayError::InvalidVectors(_)
            | GatewayError::InvalidScale(_) => true,
            GatewayError::Ledger(_) => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::InvalidRequest(e.to_string())
    }
}
