//! End-of-run normalization: cross-section scaling, then bin-width division.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tb_core::{Error, Result};
use tb_hist::HistogramSnapshot;

use crate::aggregator::HistogramSet;

/// Global normalization inputs, known only once the run is complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// Process cross section in picobarn.
    pub cross_section_pb: f64,
    /// Sum of event weights over every processed event (vetoed ones included).
    pub sum_of_weights: f64,
}

impl Normalization {
    /// `cross_section / sum_of_weights`.
    pub fn scale_factor(&self) -> Result<f64> {
        if !self.cross_section_pb.is_finite() {
            return Err(Error::Validation(format!(
                "cross section must be finite (got {})",
                self.cross_section_pb
            )));
        }
        if !self.sum_of_weights.is_finite() || self.sum_of_weights == 0.0 {
            return Err(Error::Computation(format!(
                "cannot normalize with total sum of weights = {}",
                self.sum_of_weights
            )));
        }
        if self.sum_of_weights < 0.0 {
            log::warn!("negative total sum of weights ({}); histograms flip sign", self.sum_of_weights);
        }
        Ok(self.cross_section_pb / self.sum_of_weights)
    }
}

/// Final histograms, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHistograms {
    /// Factor every histogram was multiplied by.
    pub scale_factor: f64,
    /// Snapshots by histogram name.
    pub histograms: BTreeMap<String, HistogramSnapshot>,
}

impl HistogramSet {
    /// Normalize every histogram exactly once and hand them out for export.
    ///
    /// Each histogram is scaled by the global factor first; density
    /// histograms are then divided by their own bin widths. Consuming the
    /// set makes a second application impossible.
    pub fn finalize(self, norm: &Normalization) -> Result<NormalizedHistograms> {
        let scale_factor = norm.scale_factor()?;
        log::info!(
            "normalizing {} histograms: sigma = {} pb, sum of weights = {}, scale = {scale_factor}",
            self.len(),
            norm.cross_section_pb,
            norm.sum_of_weights
        );

        let histograms = self
            .into_histograms()
            .into_iter()
            .map(|mut h| {
                h.scale(scale_factor);
                if h.is_density() {
                    h.divide_by_bin_width();
                }
                (h.name().to_string(), h.snapshot())
            })
            .collect();

        Ok(NormalizedHistograms { scale_factor, histograms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{HistKey, Observable};
    use crate::classify::Region;
    use crate::config::AnalysisConfig;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_zero_sum_of_weights() {
        let n = Normalization { cross_section_pb: 1.0, sum_of_weights: 0.0 };
        assert!(n.scale_factor().is_err());
        let n = Normalization { cross_section_pb: f64::NAN, sum_of_weights: 1.0 };
        assert!(n.scale_factor().is_err());
    }

    #[test]
    fn unit_weights_integrate_to_cross_section() {
        let cfg = AnalysisConfig::default();
        let mut set = HistogramSet::book(&cfg).unwrap();
        let region = Region::ALL[1];
        let m_key = HistKey::new(region, Observable::MbbClosest);
        let n_key = HistKey::new(region, Observable::NJets);
        let n_events = 40;
        for i in 0..n_events {
            set.fill(m_key, 10.0 + 11.0 * i as f64, 1.0).unwrap();
            set.fill(n_key, 4.0 + (i % 3) as f64, 1.0).unwrap();
        }

        let norm = Normalization { cross_section_pb: 2.5, sum_of_weights: n_events as f64 };
        let out = set.finalize(&norm).unwrap();
        assert_relative_eq!(out.scale_factor, 2.5 / 40.0);

        // Multiplicity histograms are not width-divided: plain sum.
        let nj = &out.histograms[&n_key.name()];
        assert!(!nj.density);
        assert_relative_eq!(nj.values.iter().sum::<f64>(), 2.5, epsilon = 1e-12);

        // Density histograms integrate back to the cross section.
        let m = &out.histograms[&m_key.name()];
        assert!(m.density);
        let integral: f64 = m.bins().map(|(lo, hi, v, _)| v * (hi - lo)).sum();
        assert_relative_eq!(integral, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn errors_scale_linearly() {
        let cfg = AnalysisConfig::default();
        let mut set = HistogramSet::book(&cfg).unwrap();
        let key = HistKey::new(Region::ALL[0], Observable::EventWeightSign);
        for _ in 0..4 {
            set.fill(key, 1.0, 1.0).unwrap();
        }
        let out = set.finalize(&Normalization { cross_section_pb: 3.0, sum_of_weights: 4.0 }).unwrap();
        let h = &out.histograms[&key.name()];
        assert_relative_eq!(h.values[2], 3.0);
        // sqrt(4) * 0.75
        assert_relative_eq!(h.errors[2], 1.5);
    }
}
