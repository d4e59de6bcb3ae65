//! Bin-edge definitions used when booking histograms.

use tb_core::{Error, Result};

/// How a histogram's bin edges are specified.
#[derive(Debug, Clone, PartialEq)]
pub enum Binning {
    /// Explicit, possibly variable-width edges (`n_bins + 1` values).
    Edges(Vec<f64>),
    /// `bins` equal-width bins spanning `[low, high)`.
    Uniform {
        /// Number of bins.
        bins: usize,
        /// Lower edge of the first bin.
        low: f64,
        /// Upper edge of the last bin.
        high: f64,
    },
}

impl Binning {
    /// Explicit edges.
    pub fn edges(edges: impl Into<Vec<f64>>) -> Self {
        Binning::Edges(edges.into())
    }

    /// Uniform binning.
    pub fn uniform(bins: usize, low: f64, high: f64) -> Self {
        Binning::Uniform { bins, low, high }
    }

    /// Materialize and validate the edge sequence.
    ///
    /// Edges must be finite, strictly increasing, and at least two long.
    pub fn to_edges(&self) -> Result<Vec<f64>> {
        let edges = match self {
            Binning::Edges(e) => e.clone(),
            Binning::Uniform { bins, low, high } => {
                if *bins == 0 {
                    return Err(Error::Histogram("uniform binning needs at least one bin".into()));
                }
                let width = (high - low) / *bins as f64;
                // Last edge is set exactly so `high` is not lost to rounding.
                let mut e: Vec<f64> = (0..*bins).map(|i| low + width * i as f64).collect();
                e.push(*high);
                e
            }
        };
        validate_edges(&edges)?;
        Ok(edges)
    }
}

/// Check that `edges` defines at least one bin and is finite and strictly increasing.
pub fn validate_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(Error::Histogram(format!(
            "need at least 2 bin edges, got {}",
            edges.len()
        )));
    }
    if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
        return Err(Error::Histogram(format!("non-finite bin edge {bad}")));
    }
    if let Some(w) = edges.windows(2).find(|w| w[1] <= w[0]) {
        return Err(Error::Histogram(format!(
            "bin edges must be strictly increasing ({} followed by {})",
            w[0], w[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_edges() {
        let e = Binning::uniform(4, -2.0, 2.0).to_edges().unwrap();
        assert_eq!(e.len(), 5);
        assert_relative_eq!(e[1], -1.0);
        assert_eq!(e[4], 2.0);
    }

    #[test]
    fn uniform_with_awkward_width_keeps_exact_upper_edge() {
        let e = Binning::uniform(3, 0.0, 1.0).to_edges().unwrap();
        assert_eq!(*e.last().unwrap(), 1.0);
    }

    #[test]
    fn rejects_bad_edges() {
        assert!(Binning::edges(vec![1.0]).to_edges().is_err());
        assert!(Binning::edges(vec![0.0, 1.0, 1.0]).to_edges().is_err());
        assert!(Binning::edges(vec![0.0, 2.0, 1.0]).to_edges().is_err());
        assert!(Binning::edges(vec![0.0, f64::NAN]).to_edges().is_err());
        assert!(Binning::uniform(0, 0.0, 1.0).to_edges().is_err());
        assert!(Binning::uniform(2, 1.0, 0.0).to_edges().is_err());
    }
}
