//! k-nearest-neighbor classification
//!
//! The classifier is a lazy learner: building it only records the database
//! and the sorted set of class labels. Every prediction queries the database
//! for the k nearest neighbors of the instance and reports, for each known
//! label, the fraction of those neighbors carrying it.

use crate::core::{
    ClassDistribution, ClassLabel, Classifier, Database, Description, FeatureVector, KnnError,
    Result,
};
use crate::metric::{DistanceFunction, Metric};
use crate::options::{validate, GlobalParameterConstraint, ParameterSet};
use crate::persistence::ClassifierSettings;
use log::{debug, trace};
use std::sync::Arc;

/// Name of the neighbor-count parameter
pub const K_PARAMETER: &str = "k";

/// Default neighbor count
pub const K_DEFAULT: usize = 1;

/// Description of the neighbor-count parameter
pub const K_DESCRIPTION: &str =
    "number of neighbors (>0) to take into account for classification (default=1)";

const MODEL_STATEMENT: &str = "lazy learner - provides no model";

/// k-NN classifier over a shared database
pub struct KnnClassifier<D: Database, M: DistanceFunction = Metric> {
    metric: M,
    k: usize,
    strict_labels: bool,
    constraints: Vec<Box<dyn GlobalParameterConstraint>>,
    database: Option<Arc<D>>,
    labels: Arc<[ClassLabel]>,
}

impl<D: Database> KnnClassifier<D, Metric> {
    /// Create an unbuilt classifier using the linear kernel distance and k = 1
    pub fn new() -> Self {
        Self::with_metric(Metric::default())
    }

    /// Create an unbuilt classifier from persisted settings
    pub fn from_settings(settings: &ClassifierSettings) -> Result<Self> {
        settings.validate()?;
        let mut classifier = Self::with_metric(settings.metric);
        classifier.k = settings.k;
        classifier.strict_labels = settings.strict_labels;
        Ok(classifier)
    }

    /// Current configuration in persistable form
    pub fn settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            k: self.k,
            metric: self.metric,
            strict_labels: self.strict_labels,
        }
    }
}

impl<D: Database> Default for KnnClassifier<D, Metric> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Database, M: DistanceFunction> KnnClassifier<D, M> {
    /// Create an unbuilt classifier with a custom distance function
    pub fn with_metric(metric: M) -> Self {
        Self {
            metric,
            k: K_DEFAULT,
            strict_labels: false,
            constraints: Vec::new(),
            database: None,
            labels: Arc::from(Vec::new()),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Whether neighbors with a label outside the known set fail the prediction
    pub fn is_strict(&self) -> bool {
        self.strict_labels
    }

    pub fn is_built(&self) -> bool {
        self.database.is_some()
    }

    /// Known class labels in sorted order (empty until built)
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    /// Set the neighbor count directly
    pub fn set_k(&mut self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(wrong_k(&k.to_string()));
        }
        self.k = k;
        Ok(())
    }

    /// Reject neighbors whose label is not among the known labels.
    ///
    /// Off by default: such neighbors are then left out of the tally.
    pub fn set_strict_labels(&mut self, strict: bool) {
        self.strict_labels = strict;
    }

    /// Register a constraint checked by every `set_parameters` call
    pub fn add_constraint(&mut self, constraint: Box<dyn GlobalParameterConstraint>) {
        self.constraints.push(constraint);
    }

    /// Current parameters with their descriptions
    pub fn parameters(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        params
            .declare(K_PARAMETER, K_DESCRIPTION)
            .set(K_PARAMETER, self.k.to_string());
        params
    }

    /// Configure from textual parameters
    ///
    /// Registered constraints are checked first, then `k` is parsed if
    /// present. Nothing changes unless every check passes; an unset `k`
    /// keeps the current value.
    pub fn set_parameters(&mut self, parameters: &ParameterSet) -> Result<()> {
        validate(parameters, &self.constraints)?;

        if let Some(raw) = parameters.value(K_PARAMETER) {
            self.k = parse_k(raw)?;
            debug!("k set to {}", self.k);
        }
        Ok(())
    }
}

impl<D: Database, M: DistanceFunction> Classifier<D> for KnnClassifier<D, M> {
    /// Record the database and sort the class labels
    ///
    /// The metric's parameters are checked first. Calling this again
    /// replaces the previous database and labels.
    fn build_classifier(&mut self, database: Arc<D>, labels: &[ClassLabel]) -> Result<()> {
        self.metric.validate()?;
        if labels.is_empty() {
            return Err(KnnError::invalid_state(
                "cannot build a classifier without class labels",
            ));
        }

        let mut sorted = labels.to_vec();
        sorted.sort();
        sorted.dedup();
        if sorted.len() < labels.len() {
            debug!("ignoring {} duplicate class labels", labels.len() - sorted.len());
        }

        debug!(
            "built kNN classifier over {} instances with {} class labels",
            database.len(),
            sorted.len()
        );
        self.labels = Arc::from(sorted);
        self.database = Some(database);
        Ok(())
    }

    /// Relative frequency of each known label among the k nearest neighbors
    ///
    /// Frequencies are relative to the number of neighbors actually
    /// returned, which is below k for small databases. Neighbors with an
    /// unknown label count toward that number but toward no label, unless
    /// strict label mode is on.
    fn class_distribution(&self, instance: &FeatureVector) -> Result<ClassDistribution> {
        let database = self
            .database
            .as_ref()
            .ok_or_else(|| KnnError::invalid_state("classifier has not been built"))?;

        let neighbors = database.k_nearest(instance, self.k, &self.metric)?;
        if neighbors.is_empty() {
            return Err(KnnError::invalid_state_caused_by(
                "cannot derive a class distribution from zero neighbors",
                KnnError::EmptyNeighborhood,
            ));
        }

        let mut occurrences = vec![0usize; self.labels.len()];
        for neighbor in &neighbors {
            let label = database.class_label(neighbor.id).ok_or_else(|| {
                KnnError::invalid_state_caused_by(
                    "neighbor without class label",
                    KnnError::MissingLabel(neighbor.id),
                )
            })?;

            match self.labels.binary_search(label) {
                Ok(index) => occurrences[index] += 1,
                Err(_) if self.strict_labels => {
                    return Err(KnnError::invalid_state_caused_by(
                        "neighbor label outside the known class labels",
                        KnnError::UnknownLabel(label.clone()),
                    ));
                }
                Err(_) => trace!("neighbor {} has unknown label {label}", neighbor.id),
            }
        }

        let total = neighbors.len() as f64;
        let probabilities = occurrences.iter().map(|&n| n as f64 / total).collect();
        Ok(ClassDistribution::new(Arc::clone(&self.labels), probabilities))
    }

    fn model(&self) -> String {
        MODEL_STATEMENT.to_string()
    }

    fn description(&self) -> Description {
        Description::new(
            "kNN-classifier",
            "kNN-classifier",
            "lazy classifier classifies a given instance to the majority class of the k-nearest neighbors",
            "",
        )
    }
}

fn parse_k(raw: &str) -> Result<usize> {
    match raw.trim().parse::<i64>() {
        Ok(k) if k > 0 => usize::try_from(k).map_err(|_| wrong_k(raw)),
        _ => Err(wrong_k(raw)),
    }
}

fn wrong_k(raw: &str) -> KnnError {
    KnnError::WrongParameterValue {
        name: K_PARAMETER.to_string(),
        value: raw.to_string(),
        description: K_DESCRIPTION.to_string(),
    }
}
