//! Durable, bounded, append-only operation ledger.
//!
//! On disk the ledger is a single JSON document:
//!
//! ```json
//! { "ticks": 3, "events": [ { "type": "fuzz_phase", "payload": { ... } } ] }
//! ```
//!
//! Unknown top-level fields are kept and written back unchanged.
//!
//! # Invariants
//!
//! - `ticks` grows by exactly one per recorded event and is never decremented.
//! - After any tick, `events.len() <= MAX_EVENTS`. Crossing the bound compacts
//!   the log to the newest `COMPACTED_EVENTS` entries in their original order;
//!   `ticks` keeps counting.
//! - Saves are atomic (temp file + rename). A crash mid-save leaves the previous
//!   document intact.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use vecgate_types::Event;
use vecgate_utils::{atomic_write, recover_bak_file};

pub const MAX_EVENTS: usize = 1000;
pub const COMPACTED_EVENTS: usize = 200;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse ledger at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize ledger: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write ledger at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// In-memory ledger document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    ticks: u64,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Top-level fields this build doesn't interpret.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Record one operation. Returns true if the log was compacted.
    pub fn tick(&mut self, kind: impl Into<String>, payload: Value) -> bool {
        self.ticks += 1;
        self.events.push(Event::new(kind, payload));
        if self.events.len() > MAX_EVENTS {
            let excess = self.events.len() - COMPACTED_EVENTS;
            self.events.drain(..excess);
            return true;
        }
        false
    }

    /// Load the ledger at `path`, or an empty one if nothing is stored there.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        recover_bak_file(path);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No ledger on disk, starting empty");
            return Ok(Self::new());
        }

        let bytes = std::fs::read(path).map_err(|source| LedgerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let ledger: Self = serde_json::from_slice(&bytes).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            ticks = ledger.ticks,
            events = ledger.events.len(),
            "Ledger loaded"
        );
        Ok(ledger)
    }

    /// Persist the full ledger, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(self).map_err(LedgerError::Serialize)?;
        atomic_write(path, &json).map_err(|source| LedgerError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A ledger bound to its storage location.
///
/// [`StateLedger::commit`] is the only mutation path: it ticks and saves as one
/// unit, and leaves the in-memory ledger untouched if the save fails.
/// Callers that share a `StateLedger` across tasks must serialise access
/// themselves (the orchestrator holds it behind a mutex).
#[derive(Debug)]
pub struct StateLedger {
    path: PathBuf,
    ledger: Ledger,
}

impl StateLedger {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let ledger = Ledger::load(&path)?;
        Ok(Self { path, ledger })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Tick and persist. Returns the new tick count.
    pub fn commit(&mut self, kind: &str, payload: Value) -> Result<u64, LedgerError> {
        let mut staged = self.ledger.clone();
        let compacted = staged.tick(kind, payload);

        if let Err(e) = staged.save(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                kind,
                "Ledger save failed, tick discarded: {e}"
            );
            return Err(e);
        }

        self.ledger = staged;
        tracing::info!(
            kind,
            ticks = self.ledger.ticks,
            events = self.ledger.events.len(),
            compacted,
            "Ledger tick committed"
        );
        Ok(self.ledger.ticks)
    }
}
