//! Bounded random jitter.
//!
//! The random stream is always supplied by the caller. Nothing here holds or
//! reaches for a shared generator, so two requests with the same seed see the
//! same jitter no matter what else is running.

use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use vecgate_types::VectorBatch;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("perturbation scale must be finite and non-negative (got {0})")]
pub struct InvalidScale(pub f64);

/// Fresh request-scoped stream for [`perturb`].
#[must_use]
pub fn request_stream(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Add a uniform draw from `[-scale, scale]` to every component.
///
/// Draws happen vector by vector, component by component, so the stream
/// advances by exactly `len * dim` draws.
///
/// `scale` must be finite, non-negative, and small enough that the width
/// `2 * scale` is itself finite.
pub fn perturb<R: Rng + ?Sized>(
    batch: &VectorBatch,
    scale: f64,
    rng: &mut R,
) -> Result<VectorBatch, InvalidScale> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(InvalidScale(scale));
    }
    let jitter = Uniform::new_inclusive(-scale, scale).map_err(|_| InvalidScale(scale))?;
    Ok(batch.map_components(|x| x + jitter.sample(&mut *rng)))
}
