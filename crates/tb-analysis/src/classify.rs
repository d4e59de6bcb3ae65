//! Region classification: lepton channel × b-jet multiplicity bucket.

use serde::{Deserialize, Serialize};
use tb_core::{HasMomentum, Jet, Lepton};

/// Leptons must exceed this pT (GeV) to define a channel.
pub const LEPTON_PT_MIN: f64 = 27.0;
/// Minimum number of selected jets (light + b).
pub const MIN_JETS: usize = 4;
/// Minimum number of b-tagged jets.
pub const MIN_BJETS: usize = 3;

/// Lepton channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeptonChannel {
    /// Exactly one lepton (lepton + jets).
    SingleLepton,
    /// Exactly two leptons.
    Dilepton,
}

impl LeptonChannel {
    /// Short tag used in histogram names.
    pub fn tag(self) -> &'static str {
        match self {
            LeptonChannel::SingleLepton => "ljets",
            LeptonChannel::Dilepton => "dilep",
        }
    }
}

/// b-jet multiplicity bucket. The two buckets partition `nBJets >= 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BJetBucket {
    /// Exactly three b-jets.
    Exactly3,
    /// Four or more b-jets.
    AtLeast4,
}

impl BJetBucket {
    /// Short tag used in histogram names.
    pub fn tag(self) -> &'static str {
        match self {
            BJetBucket::Exactly3 => "3b_geq4j",
            BJetBucket::AtLeast4 => "geq4b_geq4j",
        }
    }
}

/// One analysis region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Region {
    /// Lepton channel.
    pub channel: LeptonChannel,
    /// b-jet multiplicity bucket.
    pub bucket: BJetBucket,
}

impl Region {
    /// Number of regions.
    pub const COUNT: usize = 4;

    /// All regions in booking order.
    pub const ALL: [Region; Region::COUNT] = [
        Region::new(LeptonChannel::SingleLepton, BJetBucket::Exactly3),
        Region::new(LeptonChannel::SingleLepton, BJetBucket::AtLeast4),
        Region::new(LeptonChannel::Dilepton, BJetBucket::Exactly3),
        Region::new(LeptonChannel::Dilepton, BJetBucket::AtLeast4),
    ];

    /// Create a region.
    pub const fn new(channel: LeptonChannel, bucket: BJetBucket) -> Self {
        Self { channel, bucket }
    }

    /// Position in [`Region::ALL`].
    pub const fn index(self) -> usize {
        let c = match self.channel {
            LeptonChannel::SingleLepton => 0,
            LeptonChannel::Dilepton => 1,
        };
        let b = match self.bucket {
            BJetBucket::Exactly3 => 0,
            BJetBucket::AtLeast4 => 1,
        };
        c * 2 + b
    }

    /// Name suffix, e.g. `3b_geq4j_ljets`.
    pub fn name(self) -> String {
        format!("{}_{}", self.bucket.tag(), self.channel.tag())
    }
}

/// Why an event did not enter any region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoReason {
    /// Neither the single-lepton nor the dilepton predicate holds.
    NoLeptonChannel,
    /// Fewer than [`MIN_JETS`] jets.
    TooFewJets,
    /// Fewer than [`MIN_BJETS`] b-jets.
    TooFewBJets,
}

/// Region flags derived from the overlap-filtered object counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Number of selected jets.
    pub n_jets: usize,
    /// Number of b-tagged jets.
    pub n_bjets: usize,
    /// Exactly one lepton with pT above threshold.
    pub pass_single_lepton: bool,
    /// Exactly two leptons, both above threshold.
    pub pass_dilepton: bool,
    /// `nBJets >= 3 && nJets >= 4`.
    pub pass_baseline: bool,
    /// Exactly three b-jets.
    pub bucket_3b: bool,
    /// Four or more b-jets.
    pub bucket_geq4b: bool,
}

/// Classify an event from its jets and overlap-filtered leptons.
pub fn classify(jets: &[Jet], leptons: &[Lepton]) -> Classification {
    let n_jets = jets.len();
    let n_bjets = jets.iter().filter(|j| j.b_tagged).count();
    let above = |l: &Lepton| l.pt() > LEPTON_PT_MIN;

    Classification {
        n_jets,
        n_bjets,
        pass_single_lepton: leptons.len() == 1 && leptons.iter().all(above),
        pass_dilepton: leptons.len() == 2 && leptons.iter().all(above),
        pass_baseline: n_bjets >= MIN_BJETS && n_jets >= MIN_JETS,
        bucket_3b: n_bjets == 3,
        bucket_geq4b: n_bjets >= 4,
    }
}

impl Classification {
    /// First failed requirement: the jet and b-jet gate, then the lepton channel.
    pub fn veto(&self) -> Option<VetoReason> {
        if self.n_jets < MIN_JETS {
            Some(VetoReason::TooFewJets)
        } else if self.n_bjets < MIN_BJETS {
            Some(VetoReason::TooFewBJets)
        } else if !self.pass_single_lepton && !self.pass_dilepton {
            Some(VetoReason::NoLeptonChannel)
        } else {
            None
        }
    }

    /// Whether the event belongs to `region`.
    pub fn in_region(&self, region: Region) -> bool {
        let channel = match region.channel {
            LeptonChannel::SingleLepton => self.pass_single_lepton,
            LeptonChannel::Dilepton => self.pass_dilepton,
        };
        let bucket = match region.bucket {
            BJetBucket::Exactly3 => self.bucket_3b,
            BJetBucket::AtLeast4 => self.bucket_geq4b,
        };
        self.pass_baseline && channel && bucket
    }

    /// Every region the event belongs to, each combination checked independently.
    pub fn regions(&self) -> Vec<Region> {
        Region::ALL.into_iter().filter(|r| self.in_region(*r)).collect()
    }
}
