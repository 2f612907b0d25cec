//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (<x, y> + b)^d
//!
//! Where:
//! - b (bias): independent term in the polynomial
//! - d (degree): degree of the polynomial
//!
//! Common configurations:
//! - Linear kernel: d=1, b=0
//! - Quadratic kernel: d=2, b=1

use crate::core::{FeatureVector, KnnError, Result};
use crate::metric::traits::{dimensionality, SimilarityFunction};

/// Polynomial kernel with configurable degree and bias
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialKernel {
    /// Degree of the polynomial (default: 2)
    pub degree: u32,
    /// Independent term in the polynomial (default: 1.0)
    pub bias: f64,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// # Arguments
    /// * `degree` - Degree of the polynomial (must be > 0)
    /// * `bias` - Independent term in the polynomial (must be finite)
    ///
    /// # Examples
    /// ```
    /// use rknn::metric::PolynomialKernel;
    ///
    /// // Quadratic kernel: (x·y + 1)²
    /// let quad_kernel = PolynomialKernel::new(2, 1.0).unwrap();
    /// assert_eq!(quad_kernel.degree, 2);
    ///
    /// assert!(PolynomialKernel::new(0, 1.0).is_err());
    /// ```
    pub fn new(degree: u32, bias: f64) -> Result<Self> {
        if degree == 0 || i32::try_from(degree).is_err() {
            return Err(wrong_degree(degree));
        }
        if !bias.is_finite() {
            return Err(KnnError::WrongParameterValue {
                name: "bias".to_string(),
                value: bias.to_string(),
                description: "bias of the polynomial kernel (finite real)".to_string(),
            });
        }

        Ok(Self { degree, bias })
    }

    /// Linear kernel: <x, y>
    ///
    /// # Examples
    /// ```
    /// use rknn::metric::PolynomialKernel;
    ///
    /// let kernel = PolynomialKernel::linear();
    /// assert_eq!(kernel.degree, 1);
    /// assert_eq!(kernel.bias, 0.0);
    /// ```
    pub const fn linear() -> Self {
        Self {
            degree: 1,
            bias: 0.0,
        }
    }

    /// Quadratic kernel: (<x, y> + 1)²
    pub const fn quadratic() -> Self {
        Self {
            degree: 2,
            bias: 1.0,
        }
    }

    /// Whether this is the degree-1, zero-bias preset
    pub fn is_linear(&self) -> bool {
        self.degree == 1 && self.bias == 0.0
    }
}

impl Default for PolynomialKernel {
    fn default() -> Self {
        Self::quadratic()
    }
}

impl SimilarityFunction for PolynomialKernel {
    fn similarity(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64> {
        dimensionality(x, y)?;
        let dot = dot_product(x.as_slice(), y.as_slice());

        if self.is_linear() {
            return Ok(dot);
        }
        let degree = i32::try_from(self.degree).map_err(|_| wrong_degree(self.degree))?;
        Ok((dot + self.bias).powi(degree))
    }
}

fn wrong_degree(degree: u32) -> KnnError {
    KnnError::WrongParameterValue {
        name: "degree".to_string(),
        value: degree.to_string(),
        description: format!("degree of the polynomial kernel (>0, <={})", i32::MAX),
    }
}

/// Dot product over the shared dimensionality
pub(crate) fn dot_product(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}
