//! Linear model inference

use super::Inferencer;
use crate::error::{MonitorError, Result};
use ndarray::{array, aview1, Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Output link applied to the linear score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    /// Raw score (regression)
    #[default]
    Identity,
    /// Sigmoid of the score (binary classification probability)
    Logistic,
}

/// Pre-fitted linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Fitted coefficients (weights)
    pub coefficients: Vec<f64>,
    /// Fitted intercept (bias)
    #[serde(default)]
    pub intercept: f64,
    /// Output link
    #[serde(default)]
    pub link: Link,
}

impl LinearModel {
    /// Create a linear model from weights and a bias
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            link: Link::Identity,
        }
    }

    /// Set the output link
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }

    /// Number of input features the model expects
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Predict a single output value
    pub fn predict_one(&self, input: ArrayView1<'_, f64>) -> Result<f64> {
        if input.len() != self.n_features() {
            return Err(MonitorError::ShapeError {
                expected: format!("{} features", self.n_features()),
                actual: format!("{} features", input.len()),
            });
        }

        let score = input.dot(&aview1(&self.coefficients)) + self.intercept;
        Ok(match self.link {
            Link::Identity => score,
            Link::Logistic => sigmoid(score),
        })
    }

    /// Save to a JSON file
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file
    pub fn from_json_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        if model.coefficients.is_empty() {
            return Err(MonitorError::ConfigError(format!("model {} has no coefficients", path)));
        }
        Ok(model)
    }
}

impl Inferencer for LinearModel {
    fn infer(&self, input: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        let value = self
            .predict_one(input)
            .map_err(|e| MonitorError::InferenceError(e.to_string()))?;
        Ok(array![value])
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
