//! Analysis configuration (booking options and object acceptance).

use serde::{Deserialize, Serialize};
use tb_core::{Error, Result};
use tb_hist::FlowPolicy;

use crate::preselect::Preselection;

/// Uniform binning of the raw event-weight diagnostic histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBinning {
    /// Number of bins.
    pub bins: usize,
    /// Lower edge.
    pub low: f64,
    /// Upper edge.
    pub high: f64,
}

impl Default for WeightBinning {
    fn default() -> Self {
        Self { bins: 100, low: -10.0, high: 10.0 }
    }
}

/// Options shared by every histogram set of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Object acceptance applied to raw events.
    pub preselection: Preselection,
    /// Under/overflow policy for every booked histogram.
    pub flow_policy: FlowPolicy,
    /// Binning of the event-weight histogram.
    pub weight_histogram: WeightBinning,
}

impl AnalysisConfig {
    /// Validate cuts and diagnostic binning.
    pub fn validate(&self) -> Result<()> {
        self.preselection.validate()?;
        let wb = &self.weight_histogram;
        if wb.bins == 0 || !wb.low.is_finite() || !wb.high.is_finite() || wb.low >= wb.high {
            return Err(Error::Validation(format!(
                "weight_histogram needs bins > 0 and finite low < high (got {} bins, [{}, {}))",
                wb.bins, wb.low, wb.high
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"flow_policy": "fold", "preselection": {"jet_min_pt": 30.0}}"#)
                .unwrap();
        assert_eq!(cfg.flow_policy, FlowPolicy::Fold);
        assert_eq!(cfg.preselection.jet_min_pt, 30.0);
        assert_eq!(cfg.preselection.lepton_min_pt, 27.0);
        assert_eq!(cfg.weight_histogram, WeightBinning::default());
    }

    #[test]
    fn rejects_inverted_weight_range() {
        let cfg = AnalysisConfig {
            weight_histogram: WeightBinning { bins: 10, low: 1.0, high: -1.0 },
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
