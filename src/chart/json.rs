//! Line-chart document export

use super::{ChartData, Renderer};
use crate::error::Result;
use serde_json::{json, Value};
use std::path::PathBuf;

const SERIES_COLOR: &str = "rgba(255, 99, 132, 1)";

/// Renderer that rewrites a JSON line-chart document on every repaint
#[derive(Debug, Clone)]
pub struct JsonChart {
    path: PathBuf,
    data: ChartData,
}

impl JsonChart {
    /// Write to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: ChartData::default(),
        }
    }

    /// Output path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Document for the current series
    pub fn document(&self) -> Value {
        json!({
            "type": "line",
            "data": {
                "labels": self.data.labels,
                "datasets": [{
                    "label": self.data.series_label,
                    "data": self.data.values,
                    "borderColor": SERIES_COLOR,
                    "fill": false,
                }],
            },
            "options": {
                "title": { "display": true, "text": self.data.title },
                "scales": { "y": { "beginAtZero": true } },
            },
        })
    }
}

impl Renderer for JsonChart {
    fn set_series(&mut self, data: ChartData) {
        self.data = data;
    }

    fn repaint(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.document())?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
