//! Chart rendering
//!
//! The monitor pushes a label series and a value series into a [`Renderer`]
//! and then asks it to repaint. Available renderers:
//! - [`ChartState`] - keeps the last series in memory
//! - [`TerminalChart`] - ANSI line chart on stdout
//! - [`JsonChart`] - line-chart document written to a file

mod json;
mod state;
mod terminal;

pub use json::JsonChart;
pub use state::ChartState;
pub use terminal::TerminalChart;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Series handed to a renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Chart title
    pub title: String,
    /// Name of the plotted series
    pub series_label: String,
    /// X axis labels
    pub labels: Vec<String>,
    /// Y values, `None` for gaps
    pub values: Vec<Option<f64>>,
}

impl ChartData {
    /// Number of points
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the chart has no points
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Lowest and highest present value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Chart renderer capability
pub trait Renderer: Send {
    /// Replace the plotted series
    fn set_series(&mut self, data: ChartData);

    /// Redraw with the current series
    fn repaint(&mut self) -> Result<()>;
}
