//! Model monitor
//!
//! Holds the current observation buffer together with the three injected
//! collaborators: the model ([`Inferencer`]), the chart ([`Renderer`]) and
//! the loader ([`TabularSource`]).
//!
//! - [`Monitor::ingest`] replaces the buffer and repaints the chart
//! - [`Monitor::scan`] flags observations whose prediction error exceeds the threshold
//! - [`Monitor::load`] reads a source off the async runtime, then ingests it

mod anomaly;
mod config;

pub use anomaly::{Anomaly, ScanReport};
pub use config::{MonitorConfig, DEFAULT_ERROR_THRESHOLD};

use crate::chart::{ChartData, Renderer};
use crate::error::{MonitorError, Result};
use crate::inference::Inferencer;
use crate::observation::{AccuracySummary, Observation};
use crate::source::TabularSource;
use anomaly::check_observation;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Accuracy monitor over a single replaceable observation buffer
pub struct Monitor {
    model: Arc<dyn Inferencer>,
    renderer: Box<dyn Renderer>,
    source: Arc<dyn TabularSource>,
    observations: Vec<Observation>,
    config: MonitorConfig,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("observations", &self.observations.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Monitor {
    /// Create a monitor with an empty buffer
    pub fn new(
        model: Arc<dyn Inferencer>,
        renderer: Box<dyn Renderer>,
        source: Arc<dyn TabularSource>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            model,
            renderer,
            source,
            observations: Vec::new(),
            config,
        }
    }

    /// Replace the buffer and push the derived series into the chart.
    ///
    /// No validation is done here: missing timestamps become empty labels and
    /// missing accuracy values become gaps. The buffer is replaced even when
    /// the repaint fails.
    pub fn ingest(&mut self, observations: Vec<Observation>) -> Result<()> {
        if observations.is_empty() {
            warn!("Ingesting an empty dataset, chart will be cleared");
        }

        self.observations = observations;
        let data = self.chart_data();
        info!(rows = data.len(), "Ingested observations");

        self.renderer.set_series(data);
        self.renderer.repaint().map_err(|e| match e {
            MonitorError::RenderError(_) => e,
            other => MonitorError::RenderError(other.to_string()),
        })
    }

    /// Flag every observation with `|predicted - expected| > threshold`.
    ///
    /// Returns anomalies in buffer order. An empty buffer yields an empty list.
    /// A failed, wrong-shaped or non-finite model output aborts the scan with
    /// [`MonitorError::InferenceError`]; in parallel mode the reported error
    /// is from whichever failing observation was reached first.
    pub fn scan(&self) -> Result<Vec<Anomaly>> {
        if self.observations.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let model = self.model.as_ref();
        let threshold = self.config.error_threshold;

        let checked: Vec<Option<Anomaly>> = if self.config.parallel_scan {
            self.observations
                .par_iter()
                .enumerate()
                .map(|(i, obs)| check_observation(model, i, obs, threshold))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.observations
                .iter()
                .enumerate()
                .map(|(i, obs)| check_observation(model, i, obs, threshold))
                .collect::<Result<Vec<_>>>()?
        };

        let anomalies: Vec<Anomaly> = checked.into_iter().flatten().collect();

        for anomaly in &anomalies {
            debug!(
                index = anomaly.index,
                predicted = anomaly.predicted,
                error = anomaly.error,
                "Anomalous observation"
            );
        }
        info!(
            scanned = self.observations.len(),
            anomalies = anomalies.len(),
            threshold,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Anomaly scan complete"
        );

        Ok(anomalies)
    }

    /// Run [`scan`](Self::scan) and wrap the result with its context
    pub fn scan_report(&self) -> Result<ScanReport> {
        let anomalies = self.scan()?;
        Ok(ScanReport {
            scanned_at: chrono::Utc::now(),
            threshold: self.config.error_threshold,
            scanned: self.observations.len(),
            anomalies,
        })
    }

    /// Read `location` through the injected source, then [`ingest`](Self::ingest) it.
    ///
    /// Parsing runs on the blocking pool; the returned future resolving is the
    /// completion signal. Returns the number of ingested observations. A source
    /// with no rows fails with [`MonitorError::EmptyDataset`] and leaves the
    /// previous buffer in place.
    ///
    /// There is no cancellation, retry or ordering between loads. A host that
    /// shares one monitor behind a lock and starts overlapping loads gets
    /// whichever load completes last.
    pub async fn load(&mut self, location: &str) -> Result<usize> {
        let source = Arc::clone(&self.source);
        let owned = location.to_string();

        let observations = tokio::task::spawn_blocking(move || source.read(&owned))
            .await
            .map_err(|e| MonitorError::ParseError(format!("loader task failed: {}", e)))??;

        if observations.is_empty() {
            return Err(MonitorError::EmptyDataset(format!(
                "{} contains no records",
                location
            )));
        }

        let n = observations.len();
        info!(location = %location, rows = n, "Loaded observations");
        self.ingest(observations)?;
        Ok(n)
    }

    /// Label and value series derived from the buffer
    pub fn chart_data(&self) -> ChartData {
        ChartData {
            title: self.config.chart_title.clone(),
            series_label: self.config.series_label.clone(),
            labels: self.observations.iter().map(Observation::label).collect(),
            values: self.observations.iter().map(|o| o.accuracy).collect(),
        }
    }

    /// Accuracy statistics for the buffer
    pub fn summary(&self) -> AccuracySummary {
        AccuracySummary::from_observations(&self.observations)
    }

    /// Current buffer
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of buffered observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Current configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Error threshold in use
    pub fn threshold(&self) -> f64 {
        self.config.error_threshold
    }
}
