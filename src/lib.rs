//! Model Monitor - accuracy charting and prediction-error anomaly detection
//!
//! This crate watches a model's logged behaviour:
//! - Loads observation logs (timestamp, inputs, expected output, accuracy)
//! - Charts logged accuracy over time
//! - Flags observations whose absolute prediction error exceeds a threshold
//!
//! # Modules
//!
//! - [`monitor`] - The [`Monitor`](monitor::Monitor): ingest, scan, load
//! - [`observation`] - Observation records and accuracy summaries
//! - [`inference`] - The `Inferencer` capability and a linear model
//! - [`chart`] - The `Renderer` capability: in-memory, terminal and JSON charts
//! - [`source`] - The `TabularSource` capability and the CSV source
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data model
pub mod observation;

// Capabilities
pub mod inference;
pub mod chart;
pub mod source;

// Monitor
pub mod monitor;

// Services
pub mod cli;

pub use error::{MonitorError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{MonitorError, Result};

    pub use crate::observation::{Observation, AccuracySummary};

    pub use crate::inference::{Inferencer, LinearModel, Link};

    pub use crate::chart::{ChartData, ChartState, JsonChart, Renderer, TerminalChart};

    pub use crate::source::{ColumnMapping, CsvSource, TabularSource};

    pub use crate::monitor::{Anomaly, Monitor, MonitorConfig, ScanReport, DEFAULT_ERROR_THRESHOLD};
}
