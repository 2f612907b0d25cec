//! Classifiers

pub mod knn;

pub use self::knn::*;
