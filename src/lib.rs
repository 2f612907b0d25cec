//! Rust implementation of k-nearest-neighbor classification
//!
//! Instances are classified by the class distribution among their k nearest
//! neighbors in a database, under a pluggable distance function. Distances
//! can be derived from kernel functions through the kernel trick.

pub mod api;
pub mod classifier;
pub mod core;
pub mod database;
pub mod metric;
pub mod options;
pub mod persistence;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, FittedKnn, ModelInfo, KNN};
pub use crate::classifier::KnnClassifier;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{KnnError, Result};
pub use crate::database::{CsvDataset, InMemoryDatabase};
pub use crate::metric::{
    DistanceFunction, EuclideanDistance, KernelDistance, Metric, PolynomialKernel, RbfKernel,
    SimilarityFunction,
};
pub use crate::options::{
    GlobalParameterConstraint, OneMustBeSet, OnlyOneIsAllowedToBeSet, ParameterSet,
};
pub use crate::persistence::{ClassifierSettings, SettingsFile};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
