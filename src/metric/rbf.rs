//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::core::{FeatureVector, KnnError, Result};
use crate::metric::euclidean::squared_euclidean;
use crate::metric::traits::{dimensionality, SimilarityFunction};

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each stored instance:
/// - High gamma: only close points are similar
/// - Low gamma: distant points remain similar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RbfKernel {
    pub(crate) gamma: f64,
}

impl RbfKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Arguments
    /// * `gamma` - The gamma parameter (must be positive and finite)
    pub fn new(gamma: f64) -> Result<Self> {
        if !(gamma > 0.0 && gamma.is_finite()) {
            return Err(KnnError::WrongParameterValue {
                name: "gamma".to_string(),
                value: gamma.to_string(),
                description: "width of the RBF kernel (>0)".to_string(),
            });
        }
        Ok(Self { gamma })
    }

    /// Create RBF kernel with gamma = 1.0 / n_features
    pub fn with_auto_gamma(n_features: usize) -> Result<Self> {
        if n_features == 0 {
            return Err(KnnError::invalid_state(
                "cannot derive RBF gamma for zero-dimensional data",
            ));
        }
        Self::new(1.0 / n_features as f64)
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RbfKernel {
    /// Default RBF kernel with gamma = 1.0
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

impl SimilarityFunction for RbfKernel {
    fn similarity(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64> {
        dimensionality(x, y)?;
        let squared_distance = squared_euclidean(x.as_slice(), y.as_slice());
        Ok((-self.gamma * squared_distance).exp())
    }
}
