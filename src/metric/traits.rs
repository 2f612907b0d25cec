//! Similarity and distance function traits

use crate::core::{FeatureVector, KnnError, Result};

/// Similarity function trait
///
/// Kernel functions implement this; a valid kernel is symmetric and
/// positive semi-definite (Mercer's condition).
pub trait SimilarityFunction: Send + Sync {
    /// Compute similarity s(x, y)
    fn similarity(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64>;
}

/// Distance function trait
///
/// Implementations must return non-negative values with d(x, x) == 0.
pub trait DistanceFunction: Send + Sync {
    /// Compute distance d(x, y)
    fn distance(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64>;

    /// Check the function's own parameters
    ///
    /// Classifiers call this once when built, so an illegal parameter is
    /// reported before any prediction is attempted.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Shared dimensionality of two vectors
///
/// Vectors of different length are never compared component-wise; a
/// mismatch is reported instead of truncating to the shorter one.
pub fn dimensionality(x: &FeatureVector, y: &FeatureVector) -> Result<usize> {
    if x.dim() != y.dim() {
        return Err(KnnError::DimensionalityMismatch {
            expected: x.dim(),
            actual: y.dim(),
        });
    }
    Ok(x.dim())
}
