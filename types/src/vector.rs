//! Vectors and validated vector batches.
//!
//! A [`VectorBatch`] is the only way vectors enter the pipeline. Construction
//! checks that every vector shares one dimensionality and that every component
//! is finite, so the filter, perturber, and token drain can do pairwise math
//! without re-validating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fixed-length sequence of `f64` components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<f64>);

impl Vector {
    #[must_use]
    pub fn new(components: Vec<f64>) -> Self {
        Self(components)
    }

    #[must_use]
    pub fn components(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    #[must_use]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum()
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

/// Cosine similarity, defined as `0.0` when either vector has zero norm.
#[must_use]
pub fn cosine(a: &Vector, b: &Vector) -> f64 {
    cosine_with_norms(a, a.norm(), b, b.norm())
}

/// [`cosine`] with precomputed norms, for callers that compare one vector
/// against many.
#[must_use]
pub fn cosine_with_norms(a: &Vector, norm_a: f64, b: &Vector, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(b) / (norm_a * norm_b)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    #[error("vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("vector {index} has a non-finite component at position {component}")]
    NonFinite { index: usize, component: usize },
}

/// An ordered batch of vectors with a consistent dimensionality.
///
/// Order is significant: it decides triad grouping in the token drain and the
/// output order of the filter. Nothing in this crate re-sorts a batch.
///
/// # Serde
///
/// Serializes as a list of lists of numbers. Deserialization runs the same
/// validation as [`VectorBatch::new`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector>", into = "Vec<Vector>")]
pub struct VectorBatch(Vec<Vector>);

impl VectorBatch {
    pub fn new(vectors: Vec<Vector>) -> Result<Self, VectorError> {
        let expected = vectors.first().map_or(0, Vector::dim);
        for (index, vector) in vectors.iter().enumerate() {
            if vector.dim() != expected {
                return Err(VectorError::DimensionMismatch {
                    index,
                    expected,
                    found: vector.dim(),
                });
            }
            if let Some(component) = vector.components().iter().position(|x| !x.is_finite()) {
                return Err(VectorError::NonFinite { index, component });
            }
        }
        Ok(Self(vectors))
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, VectorError> {
        Self::new(rows.into_iter().map(Vector::new).collect())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shared dimensionality, or `None` for an empty batch.
    #[must_use]
    pub fn dim(&self) -> Option<usize> {
        self.0.first().map(Vector::dim)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Vector] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.0.iter()
    }

    /// Keep the vectors for which `keep` returns true, in their original order.
    ///
    /// A subset of a valid batch is valid, so this cannot fail.
    #[must_use]
    pub fn select(&self, mut keep: impl FnMut(usize, &Vector) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .enumerate()
                .filter(|(i, v)| keep(*i, v))
                .map(|(_, v)| v.clone())
                .collect(),
        )
    }

    /// Rewrite every component in place order (vector by vector, component by
    /// component). Shape is preserved.
    #[must_use]
    pub fn map_components(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self(
            self.0
                .iter()
                .map(|v| Vector(v.0.iter().map(|&x| f(x)).collect()))
                .collect(),
        )
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.0.into_iter().map(Vector::into_inner).collect()
    }
}

impl TryFrom<Vec<Vector>> for VectorBatch {
    type Error = VectorError;

    fn try_from(value: Vec<Vector>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VectorBatch> for Vec<Vector> {
    fn from(value: VectorBatch) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a VectorBatch {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
