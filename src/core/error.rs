//! Error types for the k-NN classifier

use crate::core::{ClassLabel, InstanceId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnnError {
    #[error("Dimensionality mismatch: expected {expected}, got {actual}")]
    DimensionalityMismatch { expected: usize, actual: usize },

    #[error("Wrong value for parameter \"{name}\": \"{value}\". Expected: {description}")]
    WrongParameterValue {
        name: String,
        value: String,
        description: String,
    },

    #[error("Invalid state: {message}")]
    InvalidState {
        message: String,
        #[source]
        source: Option<Box<KnnError>>,
    },

    #[error("Global parameter constraint error: {message}")]
    ConstraintViolation {
        message: String,
        parameters: Vec<String>,
    },

    #[error("Instance {0} has no class label associated")]
    MissingLabel(InstanceId),

    #[error("Class label \"{0}\" is not among the known class labels")]
    UnknownLabel(ClassLabel),

    #[error("Neighbor query returned no neighbors")]
    EmptyNeighborhood,

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl KnnError {
    /// Invalid state without an underlying cause
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            source: None,
        }
    }

    /// Invalid state wrapping the error that caused it
    pub fn invalid_state_caused_by(message: impl Into<String>, cause: KnnError) -> Self {
        Self::InvalidState {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// True for errors the caller fixes by changing configuration,
    /// false for failures of a single operation.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::WrongParameterValue { .. } | Self::ConstraintViolation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, KnnError>;
