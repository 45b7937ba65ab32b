//! Integration tests: monitor ingest / scan / load behaviour
//! Tests: chart series lengths → threshold boundary → reload semantics → error taxonomy

use model_monitor::prelude::*;
use ndarray::{array, Array1, ArrayView1};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Test collaborators
// ============================================================================

/// Model that returns a fixed prediction per input value
struct TableModel {
    predictions: HashMap<u64, f64>,
}

impl TableModel {
    fn new(pairs: &[(f64, f64)]) -> Self {
        Self {
            predictions: pairs.iter().map(|&(x, y)| (x.to_bits(), y)).collect(),
        }
    }
}

impl Inferencer for TableModel {
    fn infer(&self, input: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        self.predictions
            .get(&input[0].to_bits())
            .map(|&y| array![y])
            .ok_or_else(|| MonitorError::InferenceError(format!("no prediction for {}", input[0])))
    }
}

/// Model that returns a configurable raw output
struct RawModel(Array1<f64>);

impl Inferencer for RawModel {
    fn infer(&self, _input: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        Ok(self.0.clone())
    }
}

/// Source that serves canned payloads by location
#[derive(Default)]
struct MapSource {
    payloads: Mutex<HashMap<String, Vec<Observation>>>,
}

impl MapSource {
    fn with(self, location: &str, observations: Vec<Observation>) -> Self {
        self.payloads
            .lock()
            .unwrap()
            .insert(location.to_string(), observations);
        self
    }
}

impl TabularSource for MapSource {
    fn read(&self, location: &str) -> Result<Vec<Observation>> {
        self.payloads
            .lock()
            .unwrap()
            .get(location)
            .cloned()
            .ok_or_else(|| MonitorError::ParseError(format!("unknown source {}", location)))
    }
}

fn obs(input: f64, expected: f64) -> Observation {
    Observation::new(vec![input], expected)
}

fn build(model: impl Inferencer + 'static, source: MapSource, chart: &ChartState) -> Monitor {
    Monitor::new(
        Arc::new(model),
        Box::new(chart.clone()),
        Arc::new(source),
        MonitorConfig::default(),
    )
}

// ============================================================================
// Ingest
// ============================================================================

#[test]
fn test_ingest_series_lengths_match_observations() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    let observations: Vec<Observation> = (0..7)
        .map(|i| obs(i as f64, 0.0).with_timestamp(format!("2024-01-0{}", i + 1)).with_accuracy(0.9))
        .collect();
    monitor.ingest(observations).unwrap();

    assert_eq!(chart.labels().len(), 7);
    assert_eq!(chart.values().len(), 7);
    assert_eq!(chart.repaint_count(), 1);
}

#[test]
fn test_ingest_without_accuracy_keeps_gaps() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    monitor
        .ingest(vec![obs(1.0, 0.0), obs(2.0, 0.0).with_accuracy(0.75)])
        .unwrap();

    assert_eq!(chart.values(), vec![None, Some(0.75)]);
    assert_eq!(chart.labels(), vec!["", ""]);
}

#[test]
fn test_ingest_replaces_buffer() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0), obs(2.0, 0.0), obs(3.0, 0.0)]).unwrap();
    monitor.ingest(vec![obs(9.0, 1.0)]).unwrap();

    assert_eq!(monitor.observations(), &[obs(9.0, 1.0)]);
    assert_eq!(chart.labels().len(), 1);
    assert_eq!(chart.repaint_count(), 2);
}

#[test]
fn test_ingest_empty_clears_chart() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();
    monitor.ingest(Vec::new()).unwrap();

    assert!(monitor.is_empty());
    assert!(chart.labels().is_empty());
}

// ============================================================================
// Scan
// ============================================================================

#[test]
fn test_scan_empty_buffer_returns_empty() {
    let chart = ChartState::new();
    let monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    assert!(monitor.scan().unwrap().is_empty());
}

#[test]
fn test_scan_flags_error_above_threshold() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[(1.0, 0.6)]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();
    let anomalies = monitor.scan().unwrap();

    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].index, 0);
    assert_eq!(anomalies[0].observation, obs(1.0, 0.0));
    assert!((anomalies[0].error - 0.6).abs() < 1e-12);
}

#[test]
fn test_scan_excludes_error_equal_to_threshold() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[(1.0, 0.5)]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();

    assert!(monitor.scan().unwrap().is_empty());
}

#[test]
fn test_scan_returns_exactly_the_anomalous_observations() {
    let chart = ChartState::new();
    let model = TableModel::new(&[(1.0, 0.2), (2.0, 1.9), (3.0, -0.7), (4.0, 4.0), (5.0, 0.0)]);
    let mut monitor = build(model, MapSource::default(), &chart);

    monitor
        .ingest(vec![
            obs(1.0, 0.0),  // 0.2
            obs(2.0, 1.0),  // 0.9
            obs(3.0, 0.0),  // 0.7
            obs(4.0, 4.0),  // 0.0
            obs(5.0, 0.5),  // 0.5, boundary
        ])
        .unwrap();

    let flagged: Vec<usize> = monitor.scan().unwrap().iter().map(|a| a.index).collect();
    assert_eq!(flagged, vec![1, 2]);
}

#[test]
fn test_parallel_scan_matches_sequential() {
    let pairs: Vec<(f64, f64)> = (0..500).map(|i| (i as f64, (i % 7) as f64 * 0.3)).collect();
    let observations: Vec<Observation> = (0..500).map(|i| obs(i as f64, 0.4)).collect();

    let chart = ChartState::new();
    let mut sequential = build(TableModel::new(&pairs), MapSource::default(), &chart);
    sequential.ingest(observations.clone()).unwrap();

    let mut parallel = Monitor::new(
        Arc::new(TableModel::new(&pairs)),
        Box::new(ChartState::new()),
        Arc::new(MapSource::default()),
        MonitorConfig::default().with_parallel_scan(true),
    );
    parallel.ingest(observations).unwrap();

    assert_eq!(sequential.scan().unwrap(), parallel.scan().unwrap());
}

#[test]
fn test_scan_custom_threshold() {
    let chart = ChartState::new();
    let mut monitor = Monitor::new(
        Arc::new(TableModel::new(&[(1.0, 0.3)])),
        Box::new(chart.clone()),
        Arc::new(MapSource::default()),
        MonitorConfig::default().with_threshold(0.25),
    );

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();
    assert_eq!(monitor.scan().unwrap().len(), 1);
    assert_eq!(monitor.threshold(), 0.25);
}

#[test]
fn test_scan_does_not_touch_chart() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[(1.0, 3.0)]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();
    monitor.scan().unwrap();

    assert_eq!(chart.repaint_count(), 1);
    assert_eq!(monitor.len(), 1);
}

// ============================================================================
// Scan Error Handling
// ============================================================================

#[test]
fn test_scan_model_failure_is_inference_error() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();

    assert!(matches!(monitor.scan(), Err(MonitorError::InferenceError(_))));
}

#[test]
fn test_scan_wrong_shape_is_inference_error() {
    let chart = ChartState::new();
    let mut monitor = build(RawModel(array![0.1, 0.2]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();

    assert!(matches!(monitor.scan(), Err(MonitorError::InferenceError(_))));
}

#[test]
fn test_scan_nan_output_is_inference_error() {
    let chart = ChartState::new();
    let mut monitor = build(RawModel(array![f64::NAN]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0)]).unwrap();

    assert!(matches!(monitor.scan(), Err(MonitorError::InferenceError(_))));
}

#[test]
fn test_scan_missing_expected_is_reported() {
    let chart = ChartState::new();
    let mut monitor = build(RawModel(array![0.0]), MapSource::default(), &chart);

    let mut missing = obs(1.0, 0.0);
    missing.expected = None;
    monitor.ingest(vec![obs(1.0, 0.0), missing]).unwrap();

    match monitor.scan() {
        Err(MonitorError::MissingField { index, field }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "expected");
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_scan_missing_input_is_reported() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[(1.0, 0.0)]), MapSource::default(), &chart);

    let missing = Observation::new(vec![f64::NAN, 2.0], 0.0);
    monitor.ingest(vec![obs(1.0, 0.0), missing]).unwrap();

    match monitor.scan() {
        Err(MonitorError::MissingField { index, field }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "inputs");
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
}

// ============================================================================
// Load
// ============================================================================

#[tokio::test]
async fn test_load_twice_keeps_second_payload_only() {
    let source = MapSource::default()
        .with("data.csv", vec![obs(1.0, 0.0), obs(2.0, 0.0)])
        .with("new_data.csv", vec![obs(3.0, 1.0)]);
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), source, &chart);

    assert_eq!(monitor.load("data.csv").await.unwrap(), 2);
    assert_eq!(monitor.load("new_data.csv").await.unwrap(), 1);

    assert_eq!(monitor.observations(), &[obs(3.0, 1.0)]);
    assert_eq!(chart.labels().len(), 1);
    assert_eq!(chart.repaint_count(), 2);
}

#[tokio::test]
async fn test_load_parse_failure_keeps_buffer() {
    let source = MapSource::default().with("data.csv", vec![obs(1.0, 0.0)]);
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), source, &chart);

    monitor.load("data.csv").await.unwrap();
    let err = monitor.load("missing.csv").await.unwrap_err();

    assert!(matches!(err, MonitorError::ParseError(_)));
    assert_eq!(monitor.len(), 1);
}

#[tokio::test]
async fn test_load_empty_source_is_empty_dataset() {
    let source = MapSource::default()
        .with("data.csv", vec![obs(1.0, 0.0)])
        .with("empty.csv", Vec::new());
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), source, &chart);

    monitor.load("data.csv").await.unwrap();
    let err = monitor.load("empty.csv").await.unwrap_err();

    assert!(matches!(err, MonitorError::EmptyDataset(_)));
    assert_eq!(monitor.observations(), &[obs(1.0, 0.0)]);
    assert_eq!(chart.repaint_count(), 1);
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_scan_report_rate() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[(1.0, 1.0), (2.0, 0.0)]), MapSource::default(), &chart);

    monitor.ingest(vec![obs(1.0, 0.0), obs(2.0, 0.0)]).unwrap();
    let report = monitor.scan_report().unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.anomalies.len(), 1);
    assert!((report.anomaly_rate() - 0.5).abs() < 1e-12);
    assert_eq!(report.threshold, DEFAULT_ERROR_THRESHOLD);
}

#[test]
fn test_summary_over_buffer() {
    let chart = ChartState::new();
    let mut monitor = build(TableModel::new(&[]), MapSource::default(), &chart);

    monitor
        .ingest(vec![
            obs(1.0, 0.0).with_accuracy(0.6),
            obs(2.0, 0.0).with_accuracy(0.8),
            obs(3.0, 0.0),
        ])
        .unwrap();

    let summary = monitor.summary();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.missing, 1);
    assert!((summary.avg - 0.7).abs() < 1e-12);
}
