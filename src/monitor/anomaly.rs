//! Prediction-error anomalies

use crate::error::{MonitorError, Result};
use crate::inference::Inferencer;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// An observation whose absolute prediction error exceeded the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position in the monitor's buffer
    pub index: usize,
    /// The flagged observation
    pub observation: Observation,
    /// Model output for the observation's inputs
    pub predicted: f64,
    /// `|predicted - expected|`
    pub error: f64,
}

/// Result of one scan, with the context needed to report it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// When the scan ran
    pub scanned_at: chrono::DateTime<chrono::Utc>,
    /// Threshold the errors were compared against
    pub threshold: f64,
    /// Number of observations scanned
    pub scanned: usize,
    /// Flagged observations, in buffer order
    pub anomalies: Vec<Anomaly>,
}

impl ScanReport {
    /// Fraction of scanned observations that were flagged
    pub fn anomaly_rate(&self) -> f64 {
        if self.scanned > 0 {
            self.anomalies.len() as f64 / self.scanned as f64
        } else {
            0.0
        }
    }
}

/// Run the model on one observation and flag it when the error is strictly above `threshold`
pub(crate) fn check_observation(
    model: &dyn Inferencer,
    index: usize,
    observation: &Observation,
    threshold: f64,
) -> Result<Option<Anomaly>> {
    let expected = observation.expected.filter(|v| v.is_finite()).ok_or_else(|| MonitorError::MissingField {
        index,
        field: "expected".to_string(),
    })?;

    if observation.inputs.iter().any(|v| !v.is_finite()) {
        return Err(MonitorError::MissingField {
            index,
            field: "inputs".to_string(),
        });
    }

    let output = model
        .infer(observation.input_view())
        .map_err(|e| match e {
            MonitorError::InferenceError(msg) => {
                MonitorError::InferenceError(format!("observation {}: {}", index, msg))
            }
            other => MonitorError::InferenceError(format!("observation {}: {}", index, other)),
        })?;

    if output.len() != 1 {
        return Err(MonitorError::InferenceError(format!(
            "observation {}: expected a single output value, got {}",
            index,
            output.len()
        )));
    }

    let predicted = output[0];
    if !predicted.is_finite() {
        return Err(MonitorError::InferenceError(format!(
            "observation {}: model returned non-finite value {}",
            index, predicted
        )));
    }

    let error = (predicted - expected).abs();
    if error > threshold {
        Ok(Some(Anomaly {
            index,
            observation: observation.clone(),
            predicted,
            error,
        }))
    } else {
        Ok(None)
    }
}
