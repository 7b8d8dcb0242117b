//! Core domain types for vecgate.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the gateway.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod event;
mod token;
mod vector;

pub use event::{Event, EventKind};
pub use token::Token;
pub use vector::{Vector, VectorBatch, VectorError, cosine, cosine_with_norms};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Fuzz Mode
// ============================================================================

/// Pipeline shape for a fuzz run.
///
/// Both modes filter; `Perturb` additionally jitters the survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FuzzMode {
    #[default]
    Scrub,
    Perturb,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fuzz mode '{0}' (expected 'scrub' or 'perturb')")]
pub struct ModeParseError(pub String);

impl FuzzMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FuzzMode::Scrub => "scrub",
            FuzzMode::Perturb => "perturb",
        }
    }

    #[must_use]
    pub const fn perturbs(self) -> bool {
        matches!(self, FuzzMode::Perturb)
    }
}

impl FromStr for FuzzMode {
    type Err = ModeParseError;

    /// Exact, case-sensitive match. Anything else is rejected rather than
    /// treated as `scrub`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scrub" => Ok(FuzzMode::Scrub),
            "perturb" => Ok(FuzzMode::Perturb),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

impl TryFrom<String> for FuzzMode {
    type Error = ModeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FuzzMode> for &'static str {
    fn from(value: FuzzMode) -> Self {
        value.as_str()
    }
}

impl fmt::Display for FuzzMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
