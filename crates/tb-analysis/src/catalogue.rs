//! The fixed histogram catalogue: every (region × observable) pair.
//!
//! Keys are strongly typed and map to a dense index, so the set of booked
//! histograms cannot change after initialization and a fill can never miss.

use tb_hist::Binning;

use crate::classify::Region;
use crate::config::WeightBinning;

/// Jet and b-jet multiplicity: unit bins centred on 3..10.
pub const MULTIPLICITY_EDGES: [f64; 9] = [2.5, 3.5, 4.5, 5.5, 6.5, 7.5, 8.5, 9.5, 10.5];

/// Inclusive b-jet pT spectrum: 10 GeV bins to 200, 20 GeV to 400, then 50 GeV.
pub const BJETS_PT_EDGES: [f64; 33] = [
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0,
    150.0, 160.0, 170.0, 180.0, 190.0, 200.0, 220.0, 240.0, 260.0, 280.0, 300.0, 320.0, 340.0,
    360.0, 380.0, 400.0, 450.0, 500.0,
];

/// HT edges: 44 bins of ~34.09 GeV over [0, 1500], kept at the published precision.
pub const HT_EDGES: [f64; 45] = [
    0.00000, 34.09091, 68.18182, 102.27275, 136.36365, 170.45455, 204.54545, 238.63635, 272.72725,
    306.81815, 340.90905, 375.00005, 409.09095, 443.18185, 477.27275, 511.36365, 545.45455,
    579.54545, 613.63635, 647.72725, 681.81815, 715.90905, 750.00005, 784.09095, 818.18185,
    852.27275, 886.36365, 920.45455, 954.54545, 988.63655, 1022.72755, 1056.81855, 1090.90955,
    1124.99955, 1159.09055, 1193.18155, 1227.27255, 1261.36355, 1295.45455, 1329.54555,
    1363.63655, 1397.72755, 1431.81855, 1465.90955, 1500.00045,
];

/// Observables booked in every region, in booking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Observable {
    /// Jet multiplicity.
    NJets,
    /// b-jet multiplicity.
    NBJets,
    /// pT of every b-jet.
    AllBJetsPt,
    /// Σ pT of b-jets.
    HtBJets,
    /// Σ pT of jets and leptons.
    Ht,
    /// Σ pT of jets.
    HtHad,
    /// Hardest b-jet pT.
    LeadBJetPt,
    /// Second-hardest b-jet pT.
    SubleadBJetPt,
    /// Third-hardest b-jet pT.
    ThirdBJetPt,
    /// Fourth-hardest b-jet pT (only with ≥ 4 b-jets).
    FourthBJetPt,
    /// Leading-pair mass.
    MbbLeading,
    /// Leading-pair pT.
    PtbbLeading,
    /// Leading-pair ΔR.
    DRbbLeading,
    /// Closest-pair mass.
    MbbClosest,
    /// Closest-pair pT.
    PtbbClosest,
    /// Closest-pair ΔR.
    DRbbClosest,
    /// Highest vector-pT pair mass.
    MbbVector,
    /// Highest vector-pT pair pT.
    PtbbVector,
    /// Highest vector-pT pair ΔR.
    DRbbVector,
    /// Mean ordered-pair ΔR.
    DRbbMean,
    /// Raw event weight.
    EventWeight,
    /// Event weight sign.
    EventWeightSign,
}

impl Observable {
    /// Number of observables.
    pub const COUNT: usize = 22;

    /// All observables in booking order.
    pub const ALL: [Observable; Observable::COUNT] = [
        Observable::NJets,
        Observable::NBJets,
        Observable::AllBJetsPt,
        Observable::HtBJets,
        Observable::Ht,
        Observable::HtHad,
        Observable::LeadBJetPt,
        Observable::SubleadBJetPt,
        Observable::ThirdBJetPt,
        Observable::FourthBJetPt,
        Observable::MbbLeading,
        Observable::PtbbLeading,
        Observable::DRbbLeading,
        Observable::MbbClosest,
        Observable::PtbbClosest,
        Observable::DRbbClosest,
        Observable::MbbVector,
        Observable::PtbbVector,
        Observable::DRbbVector,
        Observable::DRbbMean,
        Observable::EventWeight,
        Observable::EventWeightSign,
    ];

    /// Position in [`Observable::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Histogram name stem.
    pub fn stem(self) -> &'static str {
        use Observable::*;
        match self {
            NJets => "N_Jets",
            NBJets => "N_b_Jets",
            AllBJetsPt => "all_bjets_pt",
            HtBJets => "ht_bjets",
            Ht => "ht",
            HtHad => "ht_had",
            LeadBJetPt => "lead_bjet_pt",
            SubleadBJetPt => "sublead_bjet_pt",
            ThirdBJetPt => "third_bjet_pt",
            FourthBJetPt => "fourth_bjet_pt",
            MbbLeading => "m_bb_leading",
            PtbbLeading => "pt_bb_leading",
            DRbbLeading => "dR_bb_leading",
            MbbClosest => "m_bb_closest",
            PtbbClosest => "pt_bb_closest",
            DRbbClosest => "dR_bb_closest",
            MbbVector => "m_bb_vector",
            PtbbVector => "pt_bb_vector",
            DRbbVector => "dR_bb_vector",
            DRbbMean => "dR_bb_mean",
            EventWeight => "event_weight",
            EventWeightSign => "event_weight_sign",
        }
    }

    /// Bin edges booked for this observable.
    pub fn binning(self, weight: &WeightBinning) -> Binning {
        use Observable::*;
        match self {
            NJets | NBJets => Binning::edges(MULTIPLICITY_EDGES),
            AllBJetsPt => Binning::edges(BJETS_PT_EDGES),
            HtBJets | Ht | HtHad => Binning::edges(HT_EDGES),
            LeadBJetPt | SubleadBJetPt | ThirdBJetPt | FourthBJetPt | PtbbLeading
            | PtbbClosest | PtbbVector => Binning::uniform(50, 0.0, 500.0),
            MbbLeading | MbbClosest | MbbVector => Binning::uniform(32, 0.0, 500.0),
            DRbbLeading | DRbbClosest | DRbbVector | DRbbMean => Binning::uniform(60, 0.0, 6.0),
            EventWeight => Binning::uniform(weight.bins, weight.low, weight.high),
            EventWeightSign => Binning::uniform(3, -1.5, 1.5),
        }
    }

    /// Kinematic distributions are divided by bin width at normalization;
    /// multiplicities and weight diagnostics are not.
    pub fn is_density(self) -> bool {
        !matches!(
            self,
            Observable::NJets
                | Observable::NBJets
                | Observable::EventWeight
                | Observable::EventWeightSign
        )
    }
}

/// Identity of one booked histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistKey {
    /// Region the histogram belongs to.
    pub region: Region,
    /// Observable it records.
    pub observable: Observable,
}

impl HistKey {
    /// Total number of booked histograms.
    pub const COUNT: usize = Region::COUNT * Observable::COUNT;

    /// Create a key.
    pub fn new(region: Region, observable: Observable) -> Self {
        Self { region, observable }
    }

    /// Dense index into the histogram array (region-major).
    pub fn index(self) -> usize {
        self.region.index() * Observable::COUNT + self.observable.index()
    }

    /// Histogram name, e.g. `m_bb_closest_geq4b_geq4j_ljets`.
    pub fn name(self) -> String {
        format!("{}_{}", self.observable.stem(), self.region.name())
    }

    /// All keys in index order.
    pub fn all() -> impl Iterator<Item = HistKey> {
        Region::ALL
            .into_iter()
            .flat_map(|r| Observable::ALL.into_iter().map(move |o| HistKey::new(r, o)))
    }
}
