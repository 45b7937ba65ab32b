//! Inference capability
//!
//! The monitor never owns a concrete model type. It calls anything that
//! implements [`Inferencer`]; [`LinearModel`] is the implementation the
//! binary loads from disk.

mod linear;

pub use linear::{LinearModel, Link};

use crate::error::Result;
use ndarray::{Array1, ArrayView1};

/// Something that maps one input row to a model output
pub trait Inferencer: Send + Sync {
    /// Run the model on a single input row
    fn infer(&self, input: ArrayView1<'_, f64>) -> Result<Array1<f64>>;
}
