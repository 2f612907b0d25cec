//! Distance derived from a kernel function
//!
//! For a positive semi-definite kernel k the feature-space distance is
//!
//! d(x, y) = sqrt(k(x, x) + k(y, y) - 2 * k(x, y))
//!
//! With the linear kernel this is exactly the Euclidean distance.

use crate::core::{FeatureVector, Result};
use crate::metric::polynomial::PolynomialKernel;
use crate::metric::traits::{dimensionality, DistanceFunction, SimilarityFunction};

/// Adapter turning a kernel into a distance function via the kernel trick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelDistance<K: SimilarityFunction> {
    kernel: K,
}

impl<K: SimilarityFunction> KernelDistance<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    /// The wrapped kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Kernel similarity of the wrapped kernel
    pub fn similarity(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64> {
        self.kernel.similarity(x, y)
    }
}

impl KernelDistance<PolynomialKernel> {
    /// Distance induced by the linear kernel
    pub const fn linear() -> Self {
        Self {
            kernel: PolynomialKernel::linear(),
        }
    }
}

impl<K: SimilarityFunction> DistanceFunction for KernelDistance<K> {
    fn distance(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64> {
        dimensionality(x, y)?;
        let xx = self.kernel.similarity(x, x)?;
        let yy = self.kernel.similarity(y, y)?;
        let xy = self.kernel.similarity(x, y)?;

        // Cancellation can push the radicand slightly below zero. NaN from
        // overflowing kernel values must stay NaN so it sorts last.
        let radicand = xx + yy - 2.0 * xy;
        if radicand < 0.0 {
            return Ok(0.0);
        }
        Ok(radicand.sqrt())
    }
}
