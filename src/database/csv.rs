//! CSV format dataset loading
//!
//! Supports loading labeled instances from CSV files where:
//! - The last column is the class label (any text)
//! - All other columns are numeric features
//! - First row can be headers (automatically detected)

use crate::core::{ClassLabel, FeatureVector, KnnError, LabeledInstance, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Labeled instances read from a CSV file
#[derive(Debug, Clone)]
pub struct CsvDataset {
    instances: Vec<LabeledInstance>,
    dimensions: usize,
}

impl CsvDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KnnError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader, detecting a header row
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(reader: R, auto_detect_header: bool) -> Result<Self> {
        let mut instances = Vec::new();
        let mut dimensions: Option<usize> = None;
        let mut first_content_line = true;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(KnnError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if first_content_line {
                first_content_line = false;
                if auto_detect_header && Self::is_header_line(line) {
                    continue;
                }
            }

            let instance = Self::parse_data_line(line).map_err(|e| {
                KnnError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;

            match dimensions {
                None => dimensions = Some(instance.features.dim()),
                Some(expected) if expected != instance.features.dim() => {
                    return Err(KnnError::ParseError(format!(
                        "Error parsing line {}: expected {} features, got {}",
                        line_num + 1,
                        expected,
                        instance.features.dim()
                    )));
                }
                Some(_) => {}
            }
            instances.push(instance);
        }

        if instances.is_empty() {
            return Err(KnnError::EmptyDataset);
        }

        Ok(CsvDataset {
            instances,
            dimensions: dimensions.unwrap_or(0),
        })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        // Labels are free text, so only the feature columns tell headers apart
        let non_numeric_count = fields
            .iter()
            .take(fields.len() - 1)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count * 2 > fields.len() - 1
    }

    /// Parse a CSV data line into a labeled instance
    fn parse_data_line(line: &str) -> Result<LabeledInstance> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() < 2 {
            return Err(KnnError::ParseError(format!(
                "Line has too few fields: {line}"
            )));
        }

        let label_str = fields[fields.len() - 1];
        if label_str.is_empty() {
            return Err(KnnError::ParseError("Missing class label".to_string()));
        }

        let values = fields[..fields.len() - 1]
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    KnnError::ParseError(format!(
                        "Invalid feature value at column {}: {}",
                        idx + 1,
                        field
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(LabeledInstance::new(
            FeatureVector::new(values),
            ClassLabel::new(label_str),
        ))
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of features per instance
    pub fn dim(&self) -> usize {
        self.dimensions
    }

    pub fn instances(&self) -> &[LabeledInstance] {
        &self.instances
    }

    pub fn into_instances(self) -> Vec<LabeledInstance> {
        self.instances
    }

    /// Distinct class labels, sorted
    pub fn labels(&self) -> Vec<ClassLabel> {
        let mut labels: Vec<ClassLabel> = self.instances.iter().map(|i| i.label.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
