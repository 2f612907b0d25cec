//! High-level API for k-NN classification
//!
//! This module provides a user-friendly interface for common tasks,
//! including fitting on labeled data, prediction, and evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rknn::api::KNN;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Store the training data
//! let knn = KNN::new().with_k(3).fit_from_csv("train.csv")?;
//!
//! // Evaluate on held-out data
//! println!("Accuracy: {:.2}%", knn.evaluate_from_csv("test.csv")? * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::classifier::{KnnClassifier, K_DEFAULT};
use crate::core::{
    ClassDistribution, ClassLabel, Classifier, Database, FeatureVector, LabeledInstance, Result,
};
use crate::database::{CsvDataset, InMemoryDatabase};
use crate::metric::{DistanceFunction, Metric};
use crate::persistence::ClassifierSettings;
use std::path::Path;
use std::sync::Arc;

/// High-level k-NN interface with builder pattern
pub struct KNN<M: DistanceFunction = Metric> {
    metric: M,
    k: usize,
    strict_labels: bool,
}

impl KNN<Metric> {
    /// Create a k-NN builder with the linear kernel distance and k = 1
    pub fn new() -> Self {
        Self::with_distance(Metric::default())
    }

    /// Create a builder from persisted settings
    pub fn from_settings(settings: &ClassifierSettings) -> Self {
        Self {
            metric: settings.metric,
            k: settings.k,
            strict_labels: settings.strict_labels,
        }
    }
}

impl Default for KNN<Metric> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DistanceFunction> KNN<M> {
    /// Create a builder with a custom distance function
    pub fn with_distance(metric: M) -> Self {
        Self {
            metric,
            k: K_DEFAULT,
            strict_labels: false,
        }
    }

    /// Set the number of neighbors
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Fail predictions on neighbor labels outside the known set
    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    /// Store labeled instances; the known labels are those present in the data
    pub fn fit<I>(self, instances: I) -> Result<FittedKnn<M>>
    where
        I: IntoIterator<Item = LabeledInstance>,
    {
        let database = Arc::new(InMemoryDatabase::from_instances(instances)?);
        let labels = database.distinct_labels();

        let mut classifier = KnnClassifier::with_metric(self.metric);
        classifier.set_k(self.k)?;
        classifier.set_strict_labels(self.strict_labels);
        classifier.build_classifier(Arc::clone(&database), &labels)?;

        Ok(FittedKnn {
            classifier,
            database,
        })
    }

    /// Fit on a loaded CSV dataset
    pub fn fit_dataset(self, dataset: &CsvDataset) -> Result<FittedKnn<M>> {
        self.fit(dataset.instances().iter().cloned())
    }

    /// Fit from CSV file (automatically detects headers)
    pub fn fit_from_csv<P: AsRef<Path>>(self, path: P) -> Result<FittedKnn<M>> {
        let dataset = CsvDataset::from_file(path)?;
        self.fit(dataset.into_instances())
    }
}

/// Built k-NN classifier with high-level prediction interface
pub struct FittedKnn<M: DistanceFunction = Metric> {
    classifier: KnnClassifier<InMemoryDatabase, M>,
    database: Arc<InMemoryDatabase>,
}

impl<M: DistanceFunction> FittedKnn<M> {
    /// Class distribution for a single instance
    pub fn class_distribution(&self, instance: &FeatureVector) -> Result<ClassDistribution> {
        self.classifier.class_distribution(instance)
    }

    /// Predict a single instance
    pub fn predict(&self, instance: &FeatureVector) -> Result<ClassLabel> {
        self.classifier.classify(instance)
    }

    /// Predict multiple instances, failing on the first error
    pub fn predict_batch(&self, instances: &[FeatureVector]) -> Result<Vec<ClassLabel>> {
        instances.iter().map(|x| self.predict(x)).collect()
    }

    /// Evaluate accuracy on labeled instances
    pub fn evaluate(&self, instances: &[LabeledInstance]) -> Result<f64> {
        Ok(self.evaluate_detailed(instances)?.accuracy())
    }

    /// Evaluate accuracy from CSV file
    pub fn evaluate_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = CsvDataset::from_file(path)?;
        self.evaluate(dataset.instances())
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed(&self, instances: &[LabeledInstance]) -> Result<EvaluationMetrics> {
        let mut labels: Vec<ClassLabel> = self.classifier.labels().to_vec();
        labels.extend(instances.iter().map(|i| i.label.clone()));
        labels.sort();
        labels.dedup();

        let mut metrics = EvaluationMetrics::new(labels);
        for instance in instances {
            let predicted = self.predict(&instance.features)?;
            metrics.record(&instance.label, &predicted);
        }
        Ok(metrics)
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            n_instances: self.database.len(),
            dimensions: self.database.dim(),
            k: self.classifier.k(),
            labels: self.classifier.labels().to_vec(),
            model: self.classifier.model(),
        }
    }

    /// Get the underlying classifier
    pub fn inner(&self) -> &KnnClassifier<InMemoryDatabase, M> {
        &self.classifier
    }
}

/// Multi-class confusion counts
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    labels: Vec<ClassLabel>,
    /// confusion[actual][predicted]
    confusion: Vec<Vec<usize>>,
}

impl EvaluationMetrics {
    fn new(labels: Vec<ClassLabel>) -> Self {
        let n = labels.len();
        Self {
            labels,
            confusion: vec![vec![0; n]; n],
        }
    }

    fn record(&mut self, actual: &ClassLabel, predicted: &ClassLabel) {
        if let (Ok(a), Ok(p)) = (
            self.labels.binary_search(actual),
            self.labels.binary_search(predicted),
        ) {
            self.confusion[a][p] += 1;
        }
    }

    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    /// Count of instances of class `actual` predicted as `predicted`
    pub fn count(&self, actual: &ClassLabel, predicted: &ClassLabel) -> usize {
        match (
            self.labels.binary_search(actual),
            self.labels.binary_search(predicted),
        ) {
            (Ok(a), Ok(p)) => self.confusion[a][p],
            _ => 0,
        }
    }

    /// Number of evaluated instances
    pub fn total(&self) -> usize {
        self.confusion.iter().flatten().sum()
    }

    /// Calculate accuracy: correct / total
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            let correct: usize = (0..self.labels.len()).map(|i| self.confusion[i][i]).sum();
            correct as f64 / total as f64
        }
    }

    /// Calculate precision for one class: TP / (TP + FP)
    pub fn precision(&self, label: &ClassLabel) -> f64 {
        let Ok(i) = self.labels.binary_search(label) else {
            return 0.0;
        };
        let predicted: usize = self.confusion.iter().map(|row| row[i]).sum();
        if predicted == 0 {
            0.0
        } else {
            self.confusion[i][i] as f64 / predicted as f64
        }
    }

    /// Calculate recall for one class: TP / (TP + FN)
    pub fn recall(&self, label: &ClassLabel) -> f64 {
        let Ok(i) = self.labels.binary_search(label) else {
            return 0.0;
        };
        let actual: usize = self.confusion[i].iter().sum();
        if actual == 0 {
            0.0
        } else {
            self.confusion[i][i] as f64 / actual as f64
        }
    }

    /// Calculate F1 score for one class
    pub fn f1_score(&self, label: &ClassLabel) -> f64 {
        let p = self.precision(label);
        let r = self.recall(label);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Unweighted mean of the per-class F1 scores
    pub fn macro_f1(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.labels.iter().map(|l| self.f1_score(l)).sum();
        sum / self.labels.len() as f64
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_instances: usize,
    pub dimensions: usize,
    pub k: usize,
    pub labels: Vec<ClassLabel>,
    pub model: String,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use crate::core::KnnError;

    /// Fit with the linear kernel distance on CSV data
    pub fn fit_csv<P: AsRef<Path>>(path: P, k: usize) -> Result<FittedKnn<Metric>> {
        KNN::new().with_k(k).fit_from_csv(path)
    }

    /// Quick evaluation: fit on training file, test on test file
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
        k: usize,
    ) -> Result<f64> {
        let model = fit_csv(train_path, k)?;
        model.evaluate_from_csv(test_path)
    }

    /// Hold-out validation helper (sequential split)
    pub fn simple_validation(dataset: &CsvDataset, train_ratio: f64, k: usize) -> Result<f64> {
        if train_ratio <= 0.0 || train_ratio >= 1.0 {
            return Err(KnnError::WrongParameterValue {
                name: "train_ratio".to_string(),
                value: train_ratio.to_string(),
                description: "fraction of instances used for training, between 0 and 1"
                    .to_string(),
            });
        }

        let instances = dataset.instances();
        let train_size = (instances.len() as f64 * train_ratio) as usize;

        // Simple sequential split (not randomized for reproducibility)
        let (train, test) = instances.split_at(train_size);
        let model = KNN::new().with_k(k).fit(train.iter().cloned())?;
        model.evaluate(test)
    }
}
