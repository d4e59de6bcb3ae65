//! `ttbb run` configuration file.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tb_analysis::AnalysisConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// JSON Lines file with one raw event per line.
    pub events: PathBuf,

    /// Output file for the run summary (pretty JSON). Defaults to stdout.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Process cross section in picobarn.
    pub cross_section_pb: f64,

    /// Override for the sum of weights (otherwise accumulated from the events).
    #[serde(default)]
    pub sum_of_weights: Option<f64>,

    /// Threads (0 = auto). Use 1 for a sequential, bit-reproducible run.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Object cuts, flow policy and diagnostic binning.
    #[serde(flatten)]
    pub analysis: AnalysisConfig,
}

fn default_threads() -> usize {
    1
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cross_section_pb.is_finite() || self.cross_section_pb <= 0.0 {
            bail!("cross_section_pb must be finite and > 0 (got {})", self.cross_section_pb);
        }
        if let Some(sow) = self.sum_of_weights
            && (!sow.is_finite() || sow == 0.0)
        {
            bail!("sum_of_weights must be finite and non-zero (got {sow})");
        }
        self.analysis.validate()?;
        Ok(())
    }
}

pub fn read_run_config(path: &Path) -> Result<RunConfig> {
    let bytes = std::fs::read(path)?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: RunConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        serde_yaml_ng::from_slice(&bytes)?
    };
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_analysis::WeightBinning;

    fn parse_yaml(s: &str) -> RunConfig {
        serde_yaml_ng::from_str(s).unwrap()
    }

    #[test]
    fn yaml_defaults() {
        let cfg = parse_yaml("events: ev.jsonl\ncross_section_pb: 2.5\n");
        assert_eq!(cfg.events, PathBuf::from("ev.jsonl"));
        assert_eq!(cfg.threads, 1);
        assert!(cfg.output.is_none());
        assert!(cfg.sum_of_weights.is_none());
        assert_eq!(cfg.analysis, AnalysisConfig::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn yaml_overrides_analysis_options() {
        let cfg = parse_yaml(
            r#"
events: ev.jsonl
cross_section_pb: 1.0
threads: 0
flow_policy: fold
preselection:
  jet_min_pt: 30.0
weight_histogram: { bins: 20, low: -2.0, high: 2.0 }
"#,
        );
        assert_eq!(cfg.threads, 0);
        assert_eq!(cfg.analysis.flow_policy, tb_analysis::FlowPolicy::Fold);
        assert_eq!(cfg.analysis.preselection.jet_min_pt, 30.0);
        assert_eq!(cfg.analysis.preselection.lepton_min_pt, 27.0);
        assert_eq!(cfg.analysis.weight_histogram, WeightBinning { bins: 20, low: -2.0, high: 2.0 });
    }

    #[test]
    fn rejects_bad_cross_section() {
        let cfg = parse_yaml("events: ev.jsonl\ncross_section_pb: -1.0\n");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_sum_of_weights_override() {
        let cfg = parse_yaml("events: ev.jsonl\ncross_section_pb: 1.0\nsum_of_weights: 0.0\n");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_weight_binning() {
        let cfg = parse_yaml(
            "events: ev.jsonl\ncross_section_pb: 1.0\nweight_histogram: { bins: 10, low: 1.0, high: -1.0 }\n",
        );
        assert!(cfg.validate().is_err());
    }
}
