//! Gateway engine for vecgate - operation orchestration over the ledger.
//!
//! This crate wires the pure pipeline in [`vecgate_core`] to an external
//! [`DecisionModel`] and a shared, durable [`StateLedger`]. It has no transport
//! dependencies; the CLI (or any server) decodes [`GatewayRequest`]s and hands
//! them to a [`GatewayOrchestrator`].

mod batch;
mod decision;
mod error;
mod gateway;
mod request;

pub use batch::{decode_line, envelope, run_batch};
pub use decision::{DecisionError, DecisionFut, DecisionModel, NoDecisionEngine};
pub use error::GatewayError;
pub use gateway::GatewayOrchestrator;
pub use request::{
    EvaluateRequest, FuzzRequest, FuzzResponse, GateRequest, GatewayRequest, HealthResponse,
    ReverseMapRequest,
};

pub use vecgate_config::{ConfigError, FuzzConfig, GatewayConfig, LogConfig};
pub use vecgate_core::{Ledger, LedgerError, StateLedger};
pub use vecgate_types::{Event, EventKind, FuzzMode, Token, Vector, VectorBatch, VectorError};
