//! Terminal line chart

use super::{ChartData, Renderer};
use crate::error::{MonitorError, Result};
use colored::*;
use std::io::Write;

const DEFAULT_WIDTH: usize = 60;

/// Renderer that draws the series as an ANSI chart
pub struct TerminalChart {
    data: ChartData,
    height: usize,
    width: usize,
    out: Box<dyn Write + Send>,
}

impl std::fmt::Debug for TerminalChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalChart")
            .field("points", &self.data.len())
            .field("height", &self.height)
            .field("width", &self.width)
            .finish()
    }
}

impl TerminalChart {
    /// Draw into `out`
    pub fn new(out: Box<dyn Write + Send>, height: usize) -> Self {
        Self {
            data: ChartData::default(),
            height: height.max(2),
            width: DEFAULT_WIDTH,
            out,
        }
    }

    /// Draw on stdout
    pub fn stdout(height: usize) -> Self {
        Self::new(Box::new(std::io::stdout()), height)
    }

    /// Set the maximum number of plotted columns
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Render the current series to a string
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.height + 4);
        lines.push(format!("  {}", self.data.title.white().bold()));

        let Some((min, max)) = self.data.value_range() else {
            lines.push(format!("  {}", "no data".truecolor(140, 140, 140)));
            return lines.join("\n") + "\n";
        };

        // y axis starts at zero unless the data goes negative
        let lo = min.min(0.0);
        let hi = if max > lo { max } else { lo + 1.0 };
        let columns = self.columns();
        let rows = self.height;

        let cells: Vec<Option<usize>> = columns
            .iter()
            .map(|v| v.map(|v| (((v - lo) / (hi - lo)) * (rows - 1) as f64).round() as usize))
            .collect();

        for row in (0..rows).rev() {
            let axis = if row == rows - 1 {
                format!("{:>8.3}", hi)
            } else if row == 0 {
                format!("{:>8.3}", lo)
            } else {
                " ".repeat(8)
            };
            let body: String = cells
                .iter()
                .map(|c| if *c == Some(row) { "●" } else { " " })
                .collect();
            lines.push(format!("{} {} {}", axis.truecolor(140, 140, 140), "┤".truecolor(100, 100, 100), body.truecolor(255, 99, 132)));
        }

        lines.push(format!("{} {}", " ".repeat(8), format!("└{}", "─".repeat(columns.len())).truecolor(100, 100, 100)));

        let first = self.data.labels.first().cloned().unwrap_or_default();
        let last = self.data.labels.last().cloned().unwrap_or_default();
        let gap = (columns.len() + 1).saturating_sub(first.chars().count() + last.chars().count());
        lines.push(format!("{}  {}{}{}", " ".repeat(8), first, " ".repeat(gap), last));
        lines.push(format!("  {} {}", "●".truecolor(255, 99, 132), self.data.series_label));

        lines.join("\n") + "\n"
    }

    /// Values averaged into at most `width` columns
    fn columns(&self) -> Vec<Option<f64>> {
        let values = &self.data.values;
        let n = values.len();
        if n <= self.width {
            return values.iter().map(|v| v.filter(|v| v.is_finite())).collect();
        }

        (0..self.width)
            .map(|i| {
                let start = i * n / self.width;
                let end = ((i + 1) * n / self.width).max(start + 1);
                let present: Vec<f64> = values[start..end]
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|v| v.is_finite())
                    .collect();
                if present.is_empty() {
                    None
                } else {
                    Some(present.iter().sum::<f64>() / present.len() as f64)
                }
            })
            .collect()
    }
}

impl Renderer for TerminalChart {
    fn set_series(&mut self, data: ChartData) {
        self.data = data;
    }

    fn repaint(&mut self) -> Result<()> {
        let rendered = self.render();
        self.out
            .write_all(rendered.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| MonitorError::RenderError(e.to_string()))
    }
}
