//! Euclidean distance

use crate::core::{FeatureVector, Result};
use crate::metric::traits::{dimensionality, DistanceFunction};

/// Euclidean distance: d(x, y) = ||x - y||
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EuclideanDistance;

impl EuclideanDistance {
    pub fn new() -> Self {
        Self
    }
}

impl DistanceFunction for EuclideanDistance {
    fn distance(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64> {
        dimensionality(x, y)?;
        Ok(squared_euclidean(x.as_slice(), y.as_slice()).sqrt())
    }
}

/// ||x - y||² over the shared dimensionality
pub(crate) fn squared_euclidean(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
