//! Observation records
//!
//! One logged row of model activity: when it happened, what the model saw,
//! what it should have produced, and optionally the accuracy logged for it.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// A single logged observation
///
/// Missing source cells are kept as `None` instead of being rejected, so a
/// malformed row still charts as a gap and only fails when a computation
/// actually needs the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Chart label, usually a date
    pub timestamp: Option<String>,
    /// Model input features, in column order. A missing cell is `NaN`.
    pub inputs: Vec<f64>,
    /// Expected model output
    pub expected: Option<f64>,
    /// Logged accuracy for this point
    pub accuracy: Option<f64>,
}

impl Observation {
    /// Create an observation from inputs and an expected output
    pub fn new(inputs: Vec<f64>, expected: f64) -> Self {
        Self {
            timestamp: None,
            inputs,
            expected: Some(expected),
            accuracy: None,
        }
    }

    /// Set the timestamp label
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the logged accuracy
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Inputs as an ndarray view
    pub fn input_view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.inputs.as_slice())
    }

    /// Label used on the chart's x axis
    pub fn label(&self) -> String {
        self.timestamp.clone().unwrap_or_default()
    }
}

/// Summary of the accuracy series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    /// Number of observations with an accuracy value
    pub count: usize,
    /// Number of observations without one
    pub missing: usize,
    /// Minimum accuracy
    pub min: f64,
    /// Maximum accuracy
    pub max: f64,
    /// Mean accuracy
    pub avg: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl AccuracySummary {
    /// Summarize the accuracy values of a set of observations
    pub fn from_observations(observations: &[Observation]) -> Self {
        let values: Vec<f64> = observations
            .iter()
            .filter_map(|o| o.accuracy)
            .filter(|v| v.is_finite())
            .collect();
        let missing = observations.len() - values.len();

        if values.is_empty() {
            return Self { missing, ..Self::default() };
        }

        let count = values.len();
        let avg = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = values.iter().map(|&x| (x - avg).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            missing,
            min,
            max,
            avg,
            std_dev: variance.sqrt(),
        }
    }
}
