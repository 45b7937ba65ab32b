//! Monitor configuration

use crate::error::{MonitorError, Result};
use crate::source::ColumnMapping;
use serde::{Deserialize, Serialize};

/// Absolute prediction error above which an observation is flagged
pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.5;

/// Configuration for the [`Monitor`](super::Monitor) and the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Strict upper bound on `|predicted - expected|`
    pub error_threshold: f64,

    /// Fan the anomaly scan out over the rayon pool
    pub parallel_scan: bool,

    /// Chart title
    pub chart_title: String,

    /// Label of the accuracy series
    pub series_label: String,

    /// Rows of the terminal chart
    pub chart_height: usize,

    /// Field delimiter of tabular sources
    pub delimiter: char,

    /// Column names used to build observations
    pub columns: ColumnMapping,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            parallel_scan: false,
            chart_title: "Model Accuracy Over Time".to_string(),
            series_label: "Model Accuracy".to_string(),
            chart_height: 12,
            delimiter: ',',
            columns: ColumnMapping::default(),
        }
    }
}

impl MonitorConfig {
    /// Create a new monitor configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the error threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Builder method to enable the parallel scan
    pub fn with_parallel_scan(mut self, parallel: bool) -> Self {
        self.parallel_scan = parallel;
        self
    }

    /// Builder method to set the chart title
    pub fn with_chart_title(mut self, title: impl Into<String>) -> Self {
        self.chart_title = title.into();
        self
    }

    /// Builder method to set the column mapping
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method to set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if !self.error_threshold.is_finite() || self.error_threshold < 0.0 {
            return Err(MonitorError::ConfigError(format!(
                "error_threshold must be a finite non-negative number, got {}",
                self.error_threshold
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(MonitorError::ConfigError(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.chart_height < 2 {
            return Err(MonitorError::ConfigError("chart_height must be at least 2".to_string()));
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
