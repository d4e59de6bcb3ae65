//! Per-event observables shared by every region the event enters.

use std::slice;

use tb_core::{FourMomentum, HasMomentum, Jet, Lepton};

use crate::catalogue::Observable;
use crate::pairs::PairCombinatorics;

/// Mass, pT and separation of a b-jet pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairObservables {
    /// Invariant mass of the summed momenta (GeV).
    pub mass: f64,
    /// pT of the summed momenta (GeV).
    pub pt: f64,
    /// ΔR between the two jets.
    pub delta_r: f64,
}

impl PairObservables {
    /// Observables of the pair `(i, j)` of `bjets`.
    pub fn of(bjets: &[Jet], (i, j): (usize, usize)) -> Self {
        let sum: FourMomentum = bjets[i].momentum + bjets[j].momentum;
        Self { mass: sum.mass(), pt: sum.pt(), delta_r: bjets[i].delta_r(&bjets[j]) }
    }
}

/// Scalar summary of one selected event (GeV for all energies).
#[derive(Debug, Clone, PartialEq)]
pub struct Observables {
    /// Jet multiplicity.
    pub n_jets: f64,
    /// b-jet multiplicity.
    pub n_bjets: f64,
    /// Σ pT of all selected jets.
    pub ht_had: f64,
    /// `ht_had` plus Σ pT of the overlap-filtered leptons.
    pub ht: f64,
    /// Σ pT of the b-jets.
    pub ht_bjets: f64,
    /// pT of every b-jet, hardest first.
    pub bjet_pts: Vec<f64>,
    /// pT of the 1st..4th hardest b-jet; `None` past the available count.
    pub ranked_bjet_pt: [Option<f64>; 4],
    /// The two hardest b-jets.
    pub leading: PairObservables,
    /// The pair with the smallest ΔR.
    pub closest: PairObservables,
    /// The pair with the largest vector-sum pT.
    pub vector: PairObservables,
    /// Mean ΔR over ordered b-jet pairs.
    pub mean_delta_r: f64,
    /// Raw event weight.
    pub weight: f64,
    /// Sign of the event weight (`1`, `-1`, or `0`).
    pub weight_sign: f64,
}

impl Observables {
    /// Compute all observables from the selected objects.
    ///
    /// `bjets` must be the b-tagged subset of `jets` in the same (descending
    /// pT) order, and `pairs` the result of scanning them.
    pub fn compute(
        jets: &[Jet],
        leptons: &[Lepton],
        bjets: &[Jet],
        pairs: &PairCombinatorics,
        weight: f64,
    ) -> Self {
        let ht_had: f64 = jets.iter().map(|j| j.pt()).sum();
        let ht = leptons.iter().map(|l| l.pt()).fold(ht_had, |acc, pt| acc + pt);
        let bjet_pts: Vec<f64> = bjets.iter().map(|b| b.pt()).collect();
        let ht_bjets = bjet_pts.iter().sum();
        let ranked_bjet_pt = std::array::from_fn(|i| bjet_pts.get(i).copied());

        let weight_sign = if weight > 0.0 {
            1.0
        } else if weight < 0.0 {
            -1.0
        } else {
            0.0
        };

        Self {
            n_jets: jets.len() as f64,
            n_bjets: bjets.len() as f64,
            ht_had,
            ht,
            ht_bjets,
            bjet_pts,
            ranked_bjet_pt,
            leading: PairObservables::of(bjets, pairs.leading),
            closest: PairObservables::of(bjets, pairs.closest),
            vector: PairObservables::of(bjets, pairs.highest_vector_pt),
            mean_delta_r: pairs.mean_delta_r,
            weight,
            weight_sign,
        }
    }

    /// First observable holding a NaN or infinite value, with that value.
    pub fn first_non_finite(&self) -> Option<(Observable, f64)> {
        Observable::ALL.into_iter().find_map(|observable| {
            self.values(observable).iter().find(|v| !v.is_finite()).map(|&v| (observable, v))
        })
    }

    /// Values to fill for `observable`: usually one, one per b-jet for the
    /// b-jet spectrum, and none for a ranked b-jet that does not exist.
    pub fn values(&self, observable: Observable) -> &[f64] {
        use Observable::*;
        match observable {
            NJets => slice::from_ref(&self.n_jets),
            NBJets => slice::from_ref(&self.n_bjets),
            AllBJetsPt => &self.bjet_pts,
            HtBJets => slice::from_ref(&self.ht_bjets),
            Ht => slice::from_ref(&self.ht),
            HtHad => slice::from_ref(&self.ht_had),
            LeadBJetPt => self.ranked_bjet_pt[0].as_slice(),
            SubleadBJetPt => self.ranked_bjet_pt[1].as_slice(),
            ThirdBJetPt => self.ranked_bjet_pt[2].as_slice(),
            FourthBJetPt => self.ranked_bjet_pt[3].as_slice(),
            MbbLeading => slice::from_ref(&self.leading.mass),
            PtbbLeading => slice::from_ref(&self.leading.pt),
            DRbbLeading => slice::from_ref(&self.leading.delta_r),
            MbbClosest => slice::from_ref(&self.closest.mass),
            PtbbClosest => slice::from_ref(&self.closest.pt),
            DRbbClosest => slice::from_ref(&self.closest.delta_r),
            MbbVector => slice::from_ref(&self.vector.mass),
            PtbbVector => slice::from_ref(&self.vector.pt),
            DRbbVector => slice::from_ref(&self.vector.delta_r),
            DRbbMean => slice::from_ref(&self.mean_delta_r),
            EventWeight => slice::from_ref(&self.weight),
            EventWeightSign => slice::from_ref(&self.weight_sign),
        }
    }
}
