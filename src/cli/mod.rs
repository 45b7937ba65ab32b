//! Model Monitor CLI Module
//!
//! Command-line interface for charting accuracy logs and scanning them for anomalies.

use clap::{Parser, Subcommand};
use colored::*;
use ndarray::{Array1, ArrayView1};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::chart::{JsonChart, Renderer, TerminalChart};
use crate::error::MonitorError;
use crate::inference::{Inferencer, LinearModel};
use crate::monitor::{Anomaly, Monitor, MonitorConfig};
use crate::source::CsvSource;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "model-monitor")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chart a model's logged accuracy and flag high-error observations")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chart logged accuracy over time
    Chart {
        /// Observation log (CSV)
        #[arg(short, long, default_value = "data.csv")]
        data: PathBuf,

        /// Write a JSON line-chart document instead of drawing in the terminal
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Flag observations whose prediction error exceeds the threshold
    Scan {
        /// Observation log (CSV)
        #[arg(short, long, default_value = "data.csv")]
        data: PathBuf,

        /// Model file (JSON linear model)
        #[arg(short, long)]
        model: PathBuf,

        /// Override the error threshold
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Scan observations in parallel
        #[arg(long)]
        parallel: bool,

        /// Print the scan report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a summary of an observation log
    Info {
        /// Observation log (CSV)
        #[arg(short, long, default_value = "data.csv")]
        data: PathBuf,
    },

    /// Interactive monitor with reload and scan actions
    Interactive {
        /// Initial observation log
        #[arg(short, long, default_value = "data.csv")]
        data: PathBuf,

        /// Observation log loaded by "Load New Data"
        #[arg(short, long, default_value = "new_data.csv")]
        reload: PathBuf,

        /// Model file (JSON linear model)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

// ─── Wiring ────────────────────────────────────────────────────────────────────

/// Stand-in used when no model file was given
struct MissingModel;

impl Inferencer for MissingModel {
    fn infer(&self, _input: ArrayView1<'_, f64>) -> crate::error::Result<Array1<f64>> {
        Err(MonitorError::InferenceError(
            "no model loaded (pass --model <file>)".to_string(),
        ))
    }
}

/// Read the configuration file if one was given, otherwise use defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MonitorConfig> {
    let config = match path {
        Some(path) => MonitorConfig::from_file(&path.to_string_lossy())?,
        None => MonitorConfig::default(),
    };
    Ok(config)
}

fn build_monitor(
    config: MonitorConfig,
    model: Option<&Path>,
    renderer: Box<dyn Renderer>,
) -> anyhow::Result<Monitor> {
    config.validate()?;

    let model: Arc<dyn Inferencer> = match model {
        Some(path) => Arc::new(LinearModel::from_json_file(&path.to_string_lossy())?),
        None => Arc::new(MissingModel),
    };

    let source = CsvSource::new(config.columns.clone()).with_delimiter(config.delimiter as u8);

    Ok(Monitor::new(model, renderer, Arc::new(source), config))
}

fn terminal_chart(config: &MonitorConfig) -> Box<dyn Renderer> {
    Box::new(TerminalChart::stdout(config.chart_height))
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_chart(
    config: MonitorConfig,
    data_path: &Path,
    json: Option<&Path>,
) -> anyhow::Result<()> {
    section("Chart");

    let renderer: Box<dyn Renderer> = match json {
        Some(path) => Box::new(JsonChart::new(path)),
        None => terminal_chart(&config),
    };
    let mut monitor = build_monitor(config, None, renderer)?;

    let rows = monitor.load(&data_path.to_string_lossy()).await?;

    if let Some(path) = json {
        println!("  {} wrote {} points to {}", ok("✓"), rows, path.display());
    }
    print_summary(&monitor);
    Ok(())
}

pub async fn cmd_scan(
    mut config: MonitorConfig,
    data_path: &Path,
    model_path: &Path,
    threshold: Option<f64>,
    parallel: bool,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(threshold) = threshold {
        config.error_threshold = threshold;
    }
    config.parallel_scan |= parallel;

    let mut monitor = build_monitor(config, Some(model_path), Box::new(crate::chart::ChartState::new()))?;
    monitor.load(&data_path.to_string_lossy()).await?;

    let report = monitor.scan_report()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    section("Anomaly Scan");
    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Model"), model_path.display());
    println!("  {:<12} {}", muted("Threshold"), report.threshold);
    println!("  {:<12} {}", muted("Scanned"), report.scanned);
    print_anomalies(&report.anomalies);
    println!(
        "  {:<12} {:.2}%",
        muted("Rate"),
        report.anomaly_rate() * 100.0
    );
    println!();
    Ok(())
}

pub async fn cmd_info(config: MonitorConfig, data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let mut monitor = build_monitor(config, None, Box::new(crate::chart::ChartState::new()))?;

    let start = Instant::now();
    let rows = monitor.load(&data_path.to_string_lossy()).await?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), rows);
    println!("  {:<12} {:?}", muted("Load time"), start.elapsed());

    let observations = monitor.observations();
    let first = observations.first().and_then(|o| o.timestamp.clone()).unwrap_or_default();
    let last = observations.last().and_then(|o| o.timestamp.clone()).unwrap_or_default();
    println!("  {:<12} {} → {}", muted("Range"), first, last);

    let missing_expected = observations.iter().filter(|o| o.expected.is_none()).count();
    println!("  {:<12} {}", muted("No expected"), missing_expected);

    print_summary(&monitor);
    Ok(())
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

pub async fn cmd_interactive(
    config: MonitorConfig,
    data_path: &Path,
    reload_path: &Path,
    model_path: Option<&Path>,
) -> anyhow::Result<()> {
    use dialoguer::{Select, theme::ColorfulTheme};

    let renderer = terminal_chart(&config);
    let mut monitor = build_monitor(config, model_path, renderer)?;

    section("Model Monitor");
    load_and_report(&mut monitor, data_path, &mut io::stdout()).await?;

    loop {
        let items = &[
            "Load New Data         reload the observation log",
            "Detect Anomalies      scan with the loaded model",
            "Exit",
        ];

        println!();
        let sel = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => {
                load_and_report(&mut monitor, reload_path, &mut io::stdout()).await?;
            }
            Some(1) => match monitor.scan() {
                Ok(anomalies) => print_anomalies(&anomalies),
                Err(e) => println!("  {} {}", "error".red(), e),
            },
            Some(2) | None => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Load a file into the monitor; load failures are reported, not fatal.
///
/// The status line is finished before loading because the repaint draws on the same stream.
async fn load_and_report<W: Write>(monitor: &mut Monitor, path: &Path, out: &mut W) -> io::Result<()> {
    writeln!(out, "  {} Loading {}", accent("›"), path.display())?;
    out.flush()?;

    let start = Instant::now();
    match monitor.load(&path.to_string_lossy()).await {
        Ok(rows) => writeln!(
            out,
            "  {} {}",
            ok("done"),
            dim(&format!("{} rows in {:?}", rows, start.elapsed()))
        ),
        Err(e) => writeln!(out, "  {} {}", "failed".red(), e),
    }
}

// ─── Output ────────────────────────────────────────────────────────────────────

fn print_summary(monitor: &Monitor) {
    let summary = monitor.summary();

    println!();
    println!("  {:<12} {}", muted("Points"), summary.count);
    println!("  {:<12} {}", muted("Gaps"), summary.missing);
    if summary.count > 0 {
        println!("  {:<12} {:.4}", muted("Min"), summary.min);
        println!("  {:<12} {:.4}", muted("Max"), summary.max);
        println!("  {:<12} {:.4}", muted("Mean"), summary.avg);
        println!("  {:<12} {:.4}", muted("Std dev"), summary.std_dev);
    }
    println!();
}

fn print_anomalies(anomalies: &[Anomaly]) {
    println!();
    if anomalies.is_empty() {
        println!("  {} no anomalies", ok("✓"));
        println!();
        return;
    }

    println!(
        "  {:>6} {:<20} {:>10} {:>10} {:>10}",
        muted("Row"),
        muted("Timestamp"),
        muted("Expected"),
        muted("Predicted"),
        muted("Error")
    );
    println!("  {}", dim(&"─".repeat(60)));

    for a in anomalies {
        println!(
            "  {:>6} {:<20} {:>10.4} {:>10.4} {:>10}",
            a.index,
            a.observation.label(),
            a.observation.expected.unwrap_or(f64::NAN),
            a.predicted,
            format!("{:.4}", a.error).red()
        );
    }

    println!("  {}", dim(&"─".repeat(60)));
    println!("  {} {}", "anomalies".red().bold(), anomalies.len());
    println!();
}
