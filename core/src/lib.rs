//! Core pipeline and ledger for vecgate.
//!
//! - [`filter`]: near-zero and cohesion filtering of vector batches
//! - [`perturb`]: bounded jitter driven by a caller-owned random stream
//! - [`drain`]: deterministic synthetic tokens from vector triads
//! - [`ledger`]: the durable, bounded operation ledger
//!
//! Everything here is synchronous. Concurrency control lives in the engine.

pub mod drain;
pub mod filter;
pub mod ledger;
pub mod perturb;

pub use drain::{drain, drain_with, triad_seed};
pub use filter::{MIN_COHESION_BATCH, NEAR_ZERO_NORM, clean};
pub use ledger::{COMPACTED_EVENTS, Ledger, LedgerError, MAX_EVENTS, StateLedger};
pub use perturb::{InvalidScale, perturb, request_stream};
