//! Tabular observation sources
//!
//! A [`TabularSource`] turns a location (usually a file path) into a list of
//! [`Observation`]s. [`CsvSource`] is backed by the polars CSV reader.

mod csv;

pub use csv::CsvSource;

use crate::error::Result;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// Something that parses a location into header-keyed observation records
pub trait TabularSource: Send + Sync {
    /// Read every record at `location`
    fn read(&self, location: &str) -> Result<Vec<Observation>>;
}

/// Column names used to build an [`Observation`] from a table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Timestamp / label column
    pub timestamp: String,
    /// Input feature columns. Empty means every other numeric column.
    pub inputs: Vec<String>,
    /// Expected output column
    pub expected: String,
    /// Logged accuracy column
    pub accuracy: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            timestamp: "date".to_string(),
            inputs: vec!["inputs".to_string()],
            expected: "outputs".to_string(),
            accuracy: "accuracy".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Builder method to set the input columns
    pub fn with_inputs<S: Into<String>>(mut self, inputs: impl IntoIterator<Item = S>) -> Self {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the expected output column
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    /// Builder method to set the timestamp column
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Builder method to set the accuracy column
    pub fn with_accuracy(mut self, accuracy: impl Into<String>) -> Self {
        self.accuracy = accuracy.into();
        self
    }

    /// Whether `name` is one of the non-input columns
    pub(crate) fn is_reserved(&self, name: &str) -> bool {
        name == self.timestamp || name == self.expected || name == self.accuracy
    }
}
