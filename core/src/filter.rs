//! Cohesion filter for vector batches.
//!
//! Two passes over the batch:
//!
//! 1. Vectors with norm `<= NEAR_ZERO_NORM` are dropped.
//! 2. If at least [`MIN_COHESION_BATCH`] survive, each survivor's mean cosine
//!    similarity to every *other* survivor is computed, and vectors whose mean
//!    falls below the threshold are dropped.
//!
//! This is a one-pass filter, not a fixed point. Removing vectors changes the
//! neighbourhood, so running `clean` again on its own output may drop more.

use vecgate_types::{Vector, VectorBatch, cosine_with_norms};

pub const NEAR_ZERO_NORM: f64 = 1e-6;

/// Smallest survivor count for which cohesion filtering runs (each vector
/// needs at least two neighbours).
pub const MIN_COHESION_BATCH: usize = 3;

#[must_use]
pub fn clean(batch: &VectorBatch, cosine_threshold: f64) -> VectorBatch {
    let survivors = batch.select(|_, v| v.norm() > NEAR_ZERO_NORM);
    if survivors.len() < MIN_COHESION_BATCH {
        tracing::debug!(
            input = batch.len(),
            survivors = survivors.len(),
            "Cohesion filter skipped, neighbourhood too small"
        );
        return survivors;
    }

    let means = mean_cosines(survivors.as_slice());
    let kept = survivors.select(|i, _| means[i] >= cosine_threshold);
    tracing::debug!(
        input = batch.len(),
        non_zero = survivors.len(),
        kept = kept.len(),
        cosine_threshold,
        "Cohesion filter applied"
    );
    kept
}

/// Mean cosine of each vector to all others, self excluded.
fn mean_cosines(vectors: &[Vector]) -> Vec<f64> {
    let norms: Vec<f64> = vectors.iter().map(Vector::norm).collect();
    let neighbours = (vectors.len() - 1).max(1) as f64;

    (0..vectors.len())
        .map(|i| {
            let sum: f64 = (0..vectors.len())
                .filter(|&j| j != i)
                .map(|j| cosine_with_norms(&vectors[i], norms[i], &vectors[j], norms[j]))
                .sum();
            sum / neighbours
        })
        .collect()
}
