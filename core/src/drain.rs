//! Token drain: deterministic synthetic tokens from vector triads.
//!
//! The batch is cut into consecutive, non-overlapping triads starting at index
//! 0; a trailing group of one or two vectors is ignored. For triad `(a, b, c)`:
//!
//! ```text
//! seed   = trunc((cos(a, b) + cos(b, c)) * 1_000_000)
//! stream = fresh generator seeded with `seed`
//! token  = "TOK-" + zero_pad4(|seed| mod 10000) + "-" + stream.range(100..=999)
//! ```
//!
//! Each triad gets its own stream, so tokens depend only on the three vectors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vecgate_types::{Token, Vector, VectorBatch, cosine};

const TRIAD: usize = 3;
const SEED_SCALE: f64 = 1_000_000.0;

/// Drain tokens using the default generator.
#[must_use]
pub fn drain(batch: &VectorBatch) -> Vec<Token> {
    drain_with::<StdRng>(batch)
}

/// Drain tokens, building each triad's stream with `R`.
#[must_use]
pub fn drain_with<R: SeedableRng + Rng>(batch: &VectorBatch) -> Vec<Token> {
    batch
        .as_slice()
        .chunks_exact(TRIAD)
        .map(|tri| {
            let seed = triad_seed(&tri[0], &tri[1], &tri[2]);
            // Negative seeds map onto the upper half of u64, keeping distinct
            // seeds distinct.
            let mut stream = R::seed_from_u64(seed as u64);
            Token::from_parts(seed, stream.random_range(100..=999))
        })
        .collect()
}

/// Integer seed for a triad: the cosine sum scaled by one million, truncated
/// toward zero.
#[must_use]
pub fn triad_seed(a: &Vector, b: &Vector, c: &Vector) -> i64 {
    let s = cosine(a, b) + cosine(b, c);
    (s * SEED_SCALE).trunc() as i64
}
