//! Core type definitions for k-NN classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Dense feature vector of fixed dimensionality
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Component values, in dimension order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Create a new feature vector
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of dimensions
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Get the value of dimension `i`
    ///
    /// # Panics
    /// Panics if i >= dim()
    pub fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Compute L2 norm
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for FeatureVector {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

/// Opaque, totally ordered class identifier
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassLabel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassLabel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identifier assigned to an instance by the database storing it
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub usize);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Feature vector tagged with its class
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledInstance {
    pub features: FeatureVector,
    pub label: ClassLabel,
}

impl LabeledInstance {
    /// Create a new labeled instance
    pub fn new(features: FeatureVector, label: ClassLabel) -> Self {
        Self { features, label }
    }
}

/// One entry of a k-nearest-neighbor query answer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborResult {
    /// Stored instance the distance was computed against
    pub id: InstanceId,
    /// Distance from the query vector
    pub distance: f64,
}

impl NeighborResult {
    pub fn new(id: InstanceId, distance: f64) -> Self {
        Self { id, distance }
    }
}

/// Probability per known class label, indexed by sorted label position
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDistribution {
    labels: Arc<[ClassLabel]>,
    probabilities: Vec<f64>,
}

impl ClassDistribution {
    /// Pair sorted labels with their probabilities
    ///
    /// # Panics
    /// Panics if the two sequences differ in length
    pub fn new(labels: Arc<[ClassLabel]>, probabilities: Vec<f64>) -> Self {
        assert_eq!(
            labels.len(),
            probabilities.len(),
            "Labels and probabilities must have same length"
        );
        Self {
            labels,
            probabilities,
        }
    }

    /// Number of known labels
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of `label`, or `None` if the label is not known
    pub fn probability(&self, label: &ClassLabel) -> Option<f64> {
        self.labels
            .binary_search(label)
            .ok()
            .map(|index| self.probabilities[index])
    }

    /// Label with the highest probability; ties go to the smallest label
    pub fn most_probable(&self) -> Option<&ClassLabel> {
        let mut best: Option<usize> = None;
        for (i, &p) in self.probabilities.iter().enumerate() {
            match best {
                Some(b) if self.probabilities[b] >= p => {}
                _ => best = Some(i),
            }
        }
        best.map(|i| &self.labels[i])
    }

    /// Iterate over (label, probability) pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&ClassLabel, f64)> {
        self.labels.iter().zip(self.probabilities.iter().copied())
    }

    /// Sum of all probabilities
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

impl fmt::Display for ClassDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(label, p)| format!("{label}:{p:.3}"))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Algorithm description for diagnostics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description {
    pub name: String,
    pub short_title: String,
    pub purpose: String,
    pub reference: String,
}

impl Description {
    pub fn new(
        name: impl Into<String>,
        short_title: impl Into<String>,
        purpose: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_title: short_title.into(),
            purpose: purpose.into(),
            reference: reference.into(),
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        write!(f, "{}", self.purpose)?;
        if !self.reference.is_empty() {
            write!(f, "\nReference: {}", self.reference)?;
        }
        Ok(())
    }
}
