//! Configurable choice of distance function
//!
//! `Metric` names one of the built-in distance functions by value, so it can
//! be written to a settings file or picked on the command line.

use crate::core::{FeatureVector, Result};
use crate::metric::{
    DistanceFunction, EuclideanDistance, KernelDistance, PolynomialKernel, RbfKernel,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in distance functions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Metric {
    /// Distance induced by the linear kernel
    #[default]
    Linear,
    /// Distance induced by a polynomial kernel
    Polynomial { degree: u32, bias: f64 },
    /// Distance induced by an RBF kernel
    Rbf { gamma: f64 },
    /// Plain Euclidean distance
    Euclidean,
}

impl DistanceFunction for Metric {
    /// Distance under the selected function
    ///
    /// Kernel parameters are taken as given; `validate` is where they are
    /// checked.
    fn distance(&self, x: &FeatureVector, y: &FeatureVector) -> Result<f64> {
        match *self {
            Metric::Linear => KernelDistance::linear().distance(x, y),
            Metric::Polynomial { degree, bias } => {
                KernelDistance::new(PolynomialKernel { degree, bias }).distance(x, y)
            }
            Metric::Rbf { gamma } => KernelDistance::new(RbfKernel { gamma }).distance(x, y),
            Metric::Euclidean => EuclideanDistance.distance(x, y),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Metric::Polynomial { degree, bias } => PolynomialKernel::new(degree, bias).map(|_| ()),
            Metric::Rbf { gamma } => RbfKernel::new(gamma).map(|_| ()),
            Metric::Linear | Metric::Euclidean => Ok(()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Linear => write!(f, "linear"),
            Metric::Polynomial { degree, bias } => {
                write!(f, "polynomial(degree={degree}, bias={bias})")
            }
            Metric::Rbf { gamma } => write!(f, "rbf(gamma={gamma})"),
            Metric::Euclidean => write!(f, "euclidean"),
        }
    }
}
