//! In-memory instance store with linear-scan k-NN queries

use crate::core::{
    ClassLabel, Database, FeatureVector, InstanceId, KnnError, LabeledInstance, NeighborResult,
    Result,
};
use crate::database::CsvDataset;
use crate::metric::DistanceFunction;

/// Vectors kept in insertion order, each optionally associated with a class label
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    vectors: Vec<FeatureVector>,
    labels: Vec<Option<ClassLabel>>,
    dimensions: Option<usize>,
}

impl InMemoryDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database holding the given labeled instances
    pub fn from_instances<I>(instances: I) -> Result<Self>
    where
        I: IntoIterator<Item = LabeledInstance>,
    {
        let mut database = Self::new();
        for instance in instances {
            database.insert(instance.features, instance.label)?;
        }
        Ok(database)
    }

    /// Build a database from a loaded CSV dataset
    pub fn from_dataset(dataset: &CsvDataset) -> Result<Self> {
        Self::from_instances(dataset.instances().iter().cloned())
    }

    /// Store a labeled vector
    pub fn insert(&mut self, features: FeatureVector, label: ClassLabel) -> Result<InstanceId> {
        self.push(features, Some(label))
    }

    /// Store a vector without class association
    pub fn insert_unlabeled(&mut self, features: FeatureVector) -> Result<InstanceId> {
        self.push(features, None)
    }

    fn push(&mut self, features: FeatureVector, label: Option<ClassLabel>) -> Result<InstanceId> {
        match self.dimensions {
            Some(expected) if expected != features.dim() => {
                return Err(KnnError::DimensionalityMismatch {
                    expected,
                    actual: features.dim(),
                });
            }
            Some(_) => {}
            None => self.dimensions = Some(features.dim()),
        }

        let id = InstanceId(self.vectors.len());
        self.vectors.push(features);
        self.labels.push(label);
        Ok(id)
    }

    /// Stored vector for `id`
    pub fn get(&self, id: InstanceId) -> Option<&FeatureVector> {
        self.vectors.get(id.0)
    }

    /// Distinct class labels of all labeled instances, sorted
    pub fn distinct_labels(&self) -> Vec<ClassLabel> {
        let mut labels: Vec<ClassLabel> = self.labels.iter().flatten().cloned().collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

impl Database for InMemoryDatabase {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dim(&self) -> usize {
        self.dimensions.unwrap_or(0)
    }

    fn k_nearest(
        &self,
        query: &FeatureVector,
        k: usize,
        metric: &dyn DistanceFunction,
    ) -> Result<Vec<NeighborResult>> {
        let mut nearest: Vec<NeighborResult> = Vec::with_capacity(k.min(self.vectors.len()));
        if k == 0 {
            return Ok(nearest);
        }

        for (i, vector) in self.vectors.iter().enumerate() {
            let distance = metric.distance(query, vector)?;

            // Equal distances keep scan order; NaN sorts last.
            let pos = nearest.partition_point(|n| n.distance <= distance || distance.is_nan());
            if pos < k {
                if nearest.len() == k {
                    nearest.pop();
                }
                nearest.insert(pos, NeighborResult::new(InstanceId(i), distance));
            }
        }

        Ok(nearest)
    }

    fn class_label(&self, id: InstanceId) -> Option<&ClassLabel> {
        self.labels.get(id.0).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{EuclideanDistance, KernelDistance};

    fn fv(values: &[f64]) -> FeatureVector {
        FeatureVector::from(values)
    }

    fn line_database() -> InMemoryDatabase {
        let mut db = InMemoryDatabase::new();
        for (x, label) in [(0.0, "a"), (1.0, "a"), (2.0, "b"), (3.0, "b"), (10.0, "c")] {
            db.insert(fv(&[x]), label.into()).unwrap();
        }
        db
    }

    fn ids(result: &[NeighborResult]) -> Vec<usize> {
        result.iter().map(|n| n.id.0).collect()
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut db = InMemoryDatabase::new();
        assert!(db.is_empty());
        assert_eq!(db.dim(), 0);

        let a = db.insert(fv(&[1.0, 2.0]), "x".into()).unwrap();
        let b = db.insert_unlabeled(fv(&[3.0, 4.0])).unwrap();
        assert_eq!(a, InstanceId(0));
        assert_eq!(b, InstanceId(1));
        assert_eq!(db.len(), 2);
        assert_eq!(db.dim(), 2);
        assert_eq!(db.get(b), Some(&fv(&[3.0, 4.0])));
        assert_eq!(db.class_label(a), Some(&ClassLabel::from("x")));
        assert_eq!(db.class_label(b), None);
        assert_eq!(db.class_label(InstanceId(9)), None);
    }

    #[test]
    fn test_insert_rejects_other_dimensionality() {
        let mut db = InMemoryDatabase::new();
        db.insert(fv(&[1.0, 2.0, 3.0]), "x".into()).unwrap();
        let result = db.insert(fv(&[1.0, 2.0, 3.0, 4.0]), "y".into());
        assert!(matches!(
            result,
            Err(KnnError::DimensionalityMismatch {
                expected: 3,
                actual: 4
            })
        ));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_k_nearest_ascending() {
        let db = line_database();
        let result = db.k_nearest(&fv(&[2.2]), 3, &EuclideanDistance).unwrap();
        assert_eq!(ids(&result), vec![2, 3, 1]);
        assert!(result.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_k_nearest_ties_keep_storage_order() {
        let db = line_database();
        // 1.0 and 3.0 are both at distance 1 from 2.0
        let result = db.k_nearest(&fv(&[2.0]), 3, &EuclideanDistance).unwrap();
        assert_eq!(ids(&result), vec![2, 1, 3]);

        let result = db.k_nearest(&fv(&[2.0]), 2, &EuclideanDistance).unwrap();
        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[test]
    fn test_k_nearest_short_store() {
        let db = line_database();
        let result = db.k_nearest(&fv(&[0.0]), 50, &KernelDistance::linear()).unwrap();
        assert_eq!(result.len(), db.len());
        assert_eq!(ids(&result), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_k_nearest_overflowing_kernel_distance_sorts_last() {
        let mut db = InMemoryDatabase::new();
        db.insert(fv(&[1e200]), "far".into()).unwrap();
        db.insert(fv(&[3.0]), "near".into()).unwrap();

        // Against the first instance every kernel term overflows (NaN);
        // against the second the distance is merely infinite.
        let result = db.k_nearest(&fv(&[5e200]), 2, &KernelDistance::linear()).unwrap();
        assert_eq!(ids(&result), vec![1, 0]);
        assert!(result[1].distance.is_nan());
    }

    #[test]
    fn test_k_nearest_empty_store_and_zero_k() {
        let db = InMemoryDatabase::new();
        assert!(db.k_nearest(&fv(&[0.0]), 5, &EuclideanDistance).unwrap().is_empty());

        let db = line_database();
        assert!(db.k_nearest(&fv(&[0.0]), 0, &EuclideanDistance).unwrap().is_empty());
    }

    #[test]
    fn test_k_nearest_propagates_metric_errors() {
        let db = line_database();
        let result = db.k_nearest(&fv(&[0.0, 1.0]), 1, &EuclideanDistance);
        assert!(matches!(result, Err(KnnError::DimensionalityMismatch { .. })));
    }

    #[test]
    fn test_distinct_labels() {
        let mut db = line_database();
        db.insert_unlabeled(fv(&[4.0])).unwrap();
        assert_eq!(
            db.distinct_labels(),
            vec![ClassLabel::from("a"), ClassLabel::from("b"), ClassLabel::from("c")]
        );
    }

    #[test]
    fn test_from_instances() {
        let db = InMemoryDatabase::from_instances(vec![
            LabeledInstance::new(fv(&[1.0]), "p".into()),
            LabeledInstance::new(fv(&[2.0]), "q".into()),
        ])
        .unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.class_label(InstanceId(1)), Some(&ClassLabel::from("q")));
    }
}
