//! Weighted 1D histogram: filling, merging and rescaling.

use serde::{Deserialize, Serialize};
use tb_core::{Error, Result};

use crate::binning::{Binning, validate_edges};
use crate::export::HistogramSnapshot;

/// Under/overflow handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowPolicy {
    /// Drop entries outside the histogram range (record them in `underflow/overflow`).
    #[default]
    Drop,
    /// Fold underflow into the first bin and overflow into the last bin.
    Fold,
}

/// A weighted 1D histogram with fixed bin edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    name: String,
    edges: Vec<f64>,
    sumw: Vec<f64>,
    sumw2: Vec<f64>,
    underflow: f64,
    overflow: f64,
    underflow_sumw2: f64,
    overflow_sumw2: f64,
    entries: u64,
    flow_policy: FlowPolicy,
    density: bool,
}

impl Histogram {
    /// Book an empty histogram.
    pub fn book(name: impl Into<String>, binning: &Binning, flow_policy: FlowPolicy) -> Result<Self> {
        let edges = binning.to_edges()?;
        let n_bins = edges.len() - 1;
        Ok(Self {
            name: name.into(),
            edges,
            sumw: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            underflow_sumw2: 0.0,
            overflow_sumw2: 0.0,
            entries: 0,
            flow_policy,
            density: false,
        })
    }

    /// Mark the histogram as a differential distribution.
    ///
    /// Density histograms are divided by bin width during normalization.
    pub fn with_density(mut self, density: bool) -> Self {
        self.density = density;
        self
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bin edges (length = `n_bins() + 1`).
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.sumw.len()
    }

    /// Sum of weights per bin.
    pub fn sumw(&self) -> &[f64] {
        &self.sumw
    }

    /// Sum of squared weights per bin.
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Underflow sum of weights (before optional folding).
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Overflow sum of weights (before optional folding).
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Number of fills that landed in a bin (including folded flows).
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Under/overflow policy.
    pub fn flow_policy(&self) -> FlowPolicy {
        self.flow_policy
    }

    /// Whether the histogram is divided by bin width at normalization.
    pub fn is_density(&self) -> bool {
        self.density
    }

    /// Bin widths.
    pub fn bin_widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Statistical error per bin, `sqrt(Σw²)`.
    pub fn errors(&self) -> Vec<f64> {
        self.sumw2.iter().map(|&s| s.sqrt()).collect()
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.sumw.iter().sum()
    }

    /// `true` if nothing has been filled yet.
    pub fn is_empty(&self) -> bool {
        self.entries == 0 && self.underflow_sumw2 == 0.0 && self.overflow_sumw2 == 0.0
    }

    /// Add `weight` at `value`.
    pub fn fill(&mut self, value: f64, weight: f64) -> Result<()> {
        if !value.is_finite() || !weight.is_finite() {
            return Err(Error::Histogram(format!(
                "non-finite fill in '{}' (value={value}, weight={weight})",
                self.name
            )));
        }

        let w2 = weight * weight;
        let n_bins = self.n_bins();

        if value < self.edges[0] {
            self.underflow += weight;
            self.underflow_sumw2 += w2;
            if self.flow_policy == FlowPolicy::Fold {
                self.add_to_bin(0, weight, w2);
            }
            return Ok(());
        }
        if value >= self.edges[n_bins] {
            self.overflow += weight;
            self.overflow_sumw2 += w2;
            if self.flow_policy == FlowPolicy::Fold {
                self.add_to_bin(n_bins - 1, weight, w2);
            }
            return Ok(());
        }

        if let Some(bin) = find_bin(&self.edges, value) {
            self.add_to_bin(bin, weight, w2);
        }
        Ok(())
    }

    fn add_to_bin(&mut self, bin: usize, weight: f64, w2: f64) {
        self.sumw[bin] += weight;
        self.sumw2[bin] += w2;
        self.entries += 1;
    }

    /// Add another histogram's contents bin by bin.
    ///
    /// Both histograms must share name, edges and flow policy.
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        if self.name != other.name
            || self.edges != other.edges
            || self.flow_policy != other.flow_policy
        {
            return Err(Error::Histogram(format!(
                "cannot merge '{}' ({} bins) with '{}' ({} bins): incompatible booking",
                self.name,
                self.n_bins(),
                other.name,
                other.n_bins()
            )));
        }
        for (a, b) in self.sumw.iter_mut().zip(&other.sumw) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.underflow_sumw2 += other.underflow_sumw2;
        self.overflow_sumw2 += other.overflow_sumw2;
        self.entries += other.entries;
        Ok(())
    }

    /// Multiply contents by `factor` (Σw² by `factor²`, so errors scale linearly).
    pub fn scale(&mut self, factor: f64) {
        let f2 = factor * factor;
        self.sumw.iter_mut().for_each(|v| *v *= factor);
        self.sumw2.iter_mut().for_each(|v| *v *= f2);
        self.underflow *= factor;
        self.overflow *= factor;
        self.underflow_sumw2 *= f2;
        self.overflow_sumw2 *= f2;
    }

    /// Divide each bin by its own width, turning counts into a density.
    pub fn divide_by_bin_width(&mut self) {
        for (bin, width) in self.bin_widths().into_iter().enumerate() {
            self.sumw[bin] /= width;
            self.sumw2[bin] /= width * width;
        }
    }

    /// Immutable export view (edges, values, errors).
    pub fn snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            name: self.name.clone(),
            edges: self.edges.clone(),
            values: self.sumw.clone(),
            errors: self.errors(),
            underflow: self.underflow,
            overflow: self.overflow,
            entries: self.entries,
            density: self.density,
        }
    }
}

/// Find the bin index for a value given sorted bin edges.
///
/// Returns `None` for underflow/overflow.
pub(crate) fn find_bin(edges: &[f64], val: f64) -> Option<usize> {
    debug_assert!(validate_edges(edges).is_ok());
    if !(val >= edges[0] && val < edges[edges.len() - 1]) {
        return None;
    }
    // First edge strictly greater than `val` closes the bin.
    let upper = edges.partition_point(|&e| e <= val);
    Some(upper - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn book(edges: &[f64], flow: FlowPolicy) -> Histogram {
        Histogram::book("h", &Binning::edges(edges.to_vec()), flow).unwrap()
    }

    #[test]
    fn fill_simple() {
        let mut h = book(&[0.0, 1.0, 2.0, 3.0], FlowPolicy::Drop);
        for x in [0.5, 1.5, 2.5, 0.5, -1.0, 3.5] {
            h.fill(x, 1.0).unwrap();
        }
        assert_eq!(h.sumw(), &[2.0, 1.0, 1.0]);
        assert_eq!(h.underflow(), 1.0);
        assert_eq!(h.overflow(), 1.0);
        assert_eq!(h.entries(), 4);
    }

    #[test]
    fn fill_with_weight() {
        let mut h = book(&[0.0, 1.0, 2.0], FlowPolicy::Drop);
        h.fill(0.5, 2.0).unwrap();
        h.fill(1.5, 3.0).unwrap();
        h.fill(0.5, 1.0).unwrap();
        assert_eq!(h.sumw(), &[3.0, 3.0]);
        assert_eq!(h.sumw2(), &[5.0, 9.0]);
    }

    #[test]
    fn negative_weights_accumulate() {
        let mut h = book(&[0.0, 1.0], FlowPolicy::Drop);
        h.fill(0.5, 2.0).unwrap();
        h.fill(0.5, -0.5).unwrap();
        assert_eq!(h.sumw(), &[1.5]);
        assert_eq!(h.sumw2(), &[4.25]);
    }

    #[test]
    fn fill_flow_fold() {
        let mut h = book(&[0.0, 1.0, 2.0], FlowPolicy::Fold);
        for x in [-1.0, 0.2, 1.2, 3.0] {
            h.fill(x, 1.0).unwrap();
        }
        assert_eq!(h.sumw(), &[2.0, 2.0]);
        assert_eq!(h.underflow(), 1.0);
        assert_eq!(h.overflow(), 1.0);
        assert_eq!(h.entries(), 4);
    }

    #[test]
    fn upper_edge_is_overflow() {
        let mut h = book(&[0.0, 1.0, 2.0], FlowPolicy::Drop);
        h.fill(2.0, 1.0).unwrap();
        assert_eq!(h.sumw(), &[0.0, 0.0]);
        assert_eq!(h.overflow(), 1.0);
    }

    #[test]
    fn non_finite_fill_is_rejected() {
        let mut h = book(&[0.0, 1.0], FlowPolicy::Drop);
        let err = h.fill(f64::NAN, 1.0).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
        assert!(h.fill(0.5, f64::INFINITY).is_err());
        assert!(h.is_empty());
    }

    #[test]
    fn find_bin_half_open_bins() {
        // Multiplicity-style edges: unit bins centred on integers.
        let edges = vec![2.5, 3.5, 4.5, 5.5];
        assert_eq!(find_bin(&edges, 2.4999), None);
        assert_eq!(find_bin(&edges, 5.5), None);
        assert_eq!(find_bin(&edges, 2.5), Some(0));
        assert_eq!(find_bin(&edges, 4.0), Some(1));
        assert_eq!(find_bin(&edges, 4.5), Some(2));
        assert_eq!(find_bin(&edges, f64::INFINITY), None);
    }

    #[test]
    fn find_bin_variable_width() {
        let edges = vec![0.0, 10.0, 20.0, 200.0, 500.0];
        assert_eq!(find_bin(&edges, 9.999), Some(0));
        assert_eq!(find_bin(&edges, 199.0), Some(2));
        assert_eq!(find_bin(&edges, 200.0), Some(3));
    }

    #[test]
    fn merge_adds_elementwise() {
        let mut a = book(&[0.0, 1.0, 2.0], FlowPolicy::Drop);
        let mut b = book(&[0.0, 1.0, 2.0], FlowPolicy::Drop);
        a.fill(0.5, 1.0).unwrap();
        b.fill(0.5, 2.0).unwrap();
        b.fill(1.5, -1.0).unwrap();
        b.fill(5.0, 3.0).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.sumw(), &[3.0, -1.0]);
        assert_eq!(a.sumw2(), &[5.0, 1.0]);
        assert_eq!(a.overflow(), 3.0);
        assert_eq!(a.entries(), 3);
    }

    #[test]
    fn merge_rejects_different_binning() {
        let mut a = book(&[0.0, 1.0, 2.0], FlowPolicy::Drop);
        let b = book(&[0.0, 1.0, 3.0], FlowPolicy::Drop);
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn scale_then_density() {
        let mut h = book(&[0.0, 1.0, 3.0], FlowPolicy::Drop);
        h.fill(0.5, 1.0).unwrap();
        h.fill(2.0, 1.0).unwrap();
        h.fill(2.5, 1.0).unwrap();

        h.scale(0.5);
        assert_eq!(h.sumw(), &[0.5, 1.0]);
        assert_eq!(h.sumw2(), &[0.25, 0.5]);

        h.divide_by_bin_width();
        assert_eq!(h.sumw(), &[0.5, 0.5]);
        assert_relative_eq!(h.sumw2()[1], 0.125);
        let integral: f64 = h.sumw().iter().zip(h.bin_widths()).map(|(v, w)| v * w).sum();
        assert_relative_eq!(integral, 1.5);
    }

    #[test]
    fn snapshot_reports_errors() {
        let mut h = book(&[0.0, 1.0], FlowPolicy::Drop).with_density(true);
        h.fill(0.5, 3.0).unwrap();
        h.fill(0.5, 4.0).unwrap();
        let s = h.snapshot();
        assert_eq!(s.values, vec![7.0]);
        assert_relative_eq!(s.errors[0], 5.0);
        assert!(s.density);
    }
}
