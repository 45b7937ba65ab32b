//! In-memory chart state
//!
//! Cloning a [`ChartState`] yields another handle to the same state, so a
//! caller can keep one handle while the monitor owns the other.

use super::{ChartData, Renderer};
use crate::error::{MonitorError, Result};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct StateInner {
    data: ChartData,
    repaints: u64,
}

/// Renderer that only records what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    inner: Arc<RwLock<StateInner>>,
}

impl ChartState {
    /// Create an empty chart state
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current series
    pub fn data(&self) -> ChartData {
        self.inner
            .read()
            .map(|inner| inner.data.clone())
            .unwrap_or_default()
    }

    /// Current x axis labels
    pub fn labels(&self) -> Vec<String> {
        self.data().labels
    }

    /// Current y values
    pub fn values(&self) -> Vec<Option<f64>> {
        self.data().values
    }

    /// Number of repaints requested so far
    pub fn repaint_count(&self) -> u64 {
        self.inner.read().map(|inner| inner.repaints).unwrap_or(0)
    }
}

impl Renderer for ChartState {
    fn set_series(&mut self, data: ChartData) {
        if let Ok(mut inner) = self.inner.write() {
            inner.data = data;
        }
    }

    fn repaint(&mut self) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| MonitorError::RenderError(e.to_string()))?;
        inner.repaints += 1;
        Ok(())
    }
}
