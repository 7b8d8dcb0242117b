//! Shared infrastructure utilities for vecgate.
//!
//! Cross-cutting helpers that don't belong in the domain-pure `vecgate-types`
//! crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{atomic_write, recover_bak_file};
