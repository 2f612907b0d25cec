//! Core traits for k-NN classification

use crate::core::{
    ClassDistribution, ClassLabel, Description, FeatureVector, InstanceId, KnnError,
    NeighborResult, Result,
};
use crate::metric::DistanceFunction;
use std::sync::Arc;

/// Store of (optionally labeled) instances answering k-nearest-neighbor queries
///
/// How the store indexes its instances is its own business; the classifier
/// only relies on the query contract.
pub trait Database: Send + Sync {
    /// Number of stored instances
    fn len(&self) -> usize;

    /// Dimensionality of the stored vectors (0 while empty)
    fn dim(&self) -> usize;

    /// The `k` stored instances closest to `query` under `metric`
    ///
    /// Results are ascending by distance, ties in storage order. A store
    /// holding fewer than `k` instances returns all of them.
    fn k_nearest(
        &self,
        query: &FeatureVector,
        k: usize,
        metric: &dyn DistanceFunction,
    ) -> Result<Vec<NeighborResult>>;

    /// Class label associated with a stored instance, if any
    fn class_label(&self, id: InstanceId) -> Option<&ClassLabel>;

    /// Check if the database is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifier predicting a class distribution from a database of labeled instances
pub trait Classifier<D: Database>: Send + Sync {
    /// Prepare the classifier for the given database and set of class labels
    fn build_classifier(&mut self, database: Arc<D>, labels: &[ClassLabel]) -> Result<()>;

    /// Probability for each known class label
    fn class_distribution(&self, instance: &FeatureVector) -> Result<ClassDistribution>;

    /// Most probable class label
    fn classify(&self, instance: &FeatureVector) -> Result<ClassLabel> {
        let distribution = self.class_distribution(instance)?;
        distribution
            .most_probable()
            .cloned()
            .ok_or_else(|| KnnError::invalid_state("classifier knows no class labels"))
    }

    /// Human-readable statement about the learned model
    fn model(&self) -> String;

    /// Description of the algorithm
    fn description(&self) -> Description;
}
