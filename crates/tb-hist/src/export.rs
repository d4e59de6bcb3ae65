//! Serializable view of a histogram for external writers.

use serde::{Deserialize, Serialize};

/// Bin edges with per-bin `(value, error)` pairs, after any normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    /// Histogram name.
    pub name: String,
    /// Bin edges (length = values.len() + 1).
    pub edges: Vec<f64>,
    /// Bin values (Σw, possibly scaled and width-divided).
    pub values: Vec<f64>,
    /// Statistical errors, `sqrt(Σw²)` per bin.
    pub errors: Vec<f64>,
    /// Underflow content.
    pub underflow: f64,
    /// Overflow content.
    pub overflow: f64,
    /// Number of in-range fills.
    pub entries: u64,
    /// Whether values are densities (divided by bin width).
    pub density: bool,
}

impl HistogramSnapshot {
    /// Iterate `(low_edge, high_edge, value, error)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.values.iter().zip(&self.errors))
            .map(|(w, (&v, &e))| (w[0], w[1], v, e))
    }
}
