//! Fiducial object selection: raw reconstructed objects → analysis [`Event`].

use serde::{Deserialize, Serialize};
use tb_core::{Error, Event, FourMomentum, Jet, Lepton, Result, sort_by_pt_desc};

/// One event as delivered by the reconstruction step: unsorted, uncut.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event weight vector; only the first (nominal) entry is used.
    pub weights: Vec<f64>,
    /// Clustered jets with b-tag decisions.
    #[serde(default)]
    pub jets: Vec<Jet>,
    /// Dressed muons.
    #[serde(default)]
    pub muons: Vec<FourMomentum>,
    /// Dressed electrons.
    #[serde(default)]
    pub electrons: Vec<FourMomentum>,
}

/// Kinematic acceptance for jets and dressed leptons (GeV).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preselection {
    /// Jets need `pt > jet_min_pt`.
    pub jet_min_pt: f64,
    /// Jets need `|eta| < jet_max_abs_eta`.
    pub jet_max_abs_eta: f64,
    /// Leptons need `pt >= lepton_min_pt`.
    pub lepton_min_pt: f64,
    /// Leptons need `|eta| < lepton_max_abs_eta`.
    pub lepton_max_abs_eta: f64,
}

impl Default for Preselection {
    fn default() -> Self {
        Self { jet_min_pt: 25.0, jet_max_abs_eta: 2.5, lepton_min_pt: 27.0, lepton_max_abs_eta: 2.5 }
    }
}

impl Preselection {
    /// Check that every cut is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let cuts = [
            ("jet_min_pt", self.jet_min_pt),
            ("jet_max_abs_eta", self.jet_max_abs_eta),
            ("lepton_min_pt", self.lepton_min_pt),
            ("lepton_max_abs_eta", self.lepton_max_abs_eta),
        ];
        for (name, v) in cuts {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Validation(format!("preselection.{name} must be >= 0 (got {v})")));
            }
        }
        Ok(())
    }

    /// Whether a jet is inside the acceptance.
    pub fn accepts_jet(&self, jet: &Jet) -> bool {
        let p = &jet.momentum;
        p.pt() > self.jet_min_pt && p.abs_eta() < self.jet_max_abs_eta
    }

    /// Whether a dressed lepton is inside the acceptance.
    pub fn accepts_lepton(&self, p: &FourMomentum) -> bool {
        p.pt() >= self.lepton_min_pt && p.abs_eta() < self.lepton_max_abs_eta
    }

    /// Select, sort and assemble the analysis event.
    ///
    /// Jets, muons and electrons are each sorted by descending pT; the
    /// lepton list is the muons followed by the electrons, not re-sorted as
    /// a whole. Momenta are checked for finiteness before any cut is applied.
    pub fn apply(&self, raw: &RawEvent) -> Result<Event> {
        let weight = *raw
            .weights
            .first()
            .ok_or_else(|| Error::Validation("event has an empty weight vector".into()))?;

        let muons: Vec<Lepton> = raw.muons.iter().copied().map(Lepton::muon).collect();
        let electrons: Vec<Lepton> = raw.electrons.iter().copied().map(Lepton::electron).collect();
        let all_leptons: Vec<Lepton> = muons.iter().chain(&electrons).copied().collect();
        tb_core::validate_inputs(&raw.jets, &all_leptons, weight)?;

        let mut jets: Vec<Jet> = raw.jets.iter().filter(|j| self.accepts_jet(j)).copied().collect();
        sort_by_pt_desc(&mut jets);

        let mut muons: Vec<Lepton> =
            muons.into_iter().filter(|l| self.accepts_lepton(&l.momentum)).collect();
        let mut electrons: Vec<Lepton> =
            electrons.into_iter().filter(|l| self.accepts_lepton(&l.momentum)).collect();
        sort_by_pt_desc(&mut muons);
        sort_by_pt_desc(&mut electrons);

        let mut leptons = muons;
        leptons.extend(electrons);

        Ok(Event::new(jets, leptons, weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_core::LeptonFlavour;

    fn p(pt: f64, eta: f64) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(pt, eta, 0.3, 0.0)
    }

    #[test]
    fn applies_cuts_and_sorts_jets() {
        let raw = RawEvent {
            weights: vec![0.7, 1.3],
            jets: vec![
                Jet::light(p(30.0, 0.0)),
                Jet::b(p(90.0, 1.0)),
                Jet::b(FourMomentum::new(25.0, 0.0, 0.0, 25.0)), // pT cut is strict
                Jet::b(p(70.0, 2.6)), // outside eta acceptance
                Jet::light(p(50.0, -2.0)),
            ],
            muons: vec![],
            electrons: vec![],
        };
        let ev = Preselection::default().apply(&raw).unwrap();
        assert_eq!(ev.weight, 0.7);
        let pts: Vec<f64> = ev.jets.iter().map(|j| j.momentum.pt().round()).collect();
        assert_eq!(pts, vec![90.0, 50.0, 30.0]);
        assert!(ev.jets[0].b_tagged);
    }

    #[test]
    fn leptons_are_muons_then_electrons() {
        let raw = RawEvent {
            weights: vec![1.0],
            jets: vec![],
            muons: vec![p(30.0, 0.0), p(45.0, 0.5)],
            electrons: vec![p(80.0, 0.0), p(26.9, 0.0)],
        };
        let ev = Preselection::default().apply(&raw).unwrap();
        let got: Vec<(LeptonFlavour, f64)> =
            ev.leptons.iter().map(|l| (l.flavour, l.momentum.pt().round())).collect();
        assert_eq!(
            got,
            vec![
                (LeptonFlavour::Muon, 45.0),
                (LeptonFlavour::Muon, 30.0),
                (LeptonFlavour::Electron, 80.0),
            ]
        );
    }

    #[test]
    fn lepton_pt_threshold_is_inclusive() {
        let sel = Preselection::default();
        let at_threshold = FourMomentum::new(27.0, 0.0, 0.0, 27.0);
        assert!(sel.accepts_lepton(&at_threshold));
    }

    #[test]
    fn empty_weight_vector_is_rejected() {
        let err = Preselection::default().apply(&RawEvent::default()).unwrap_err();
        assert!(err.to_string().contains("empty weight vector"));
    }

    #[test]
    fn non_finite_object_is_fatal_even_if_cut_away() {
        let raw = RawEvent {
            weights: vec![1.0],
            jets: vec![Jet::light(FourMomentum::new(1.0, f64::NAN, 0.0, 2.0))],
            ..RawEvent::default()
        };
        assert!(matches!(Preselection::default().apply(&raw), Err(Error::NonFinite(_))));
    }

    #[test]
    fn parses_json_line() {
        let line = r#"{"weights":[2.5],"jets":[{"px":40,"py":0,"pz":0,"e":40,"b_tagged":true}],"electrons":[{"px":0,"py":30,"pz":0,"e":30}]}"#;
        let raw: RawEvent = serde_json::from_str(line).unwrap();
        assert_eq!(raw.jets.len(), 1);
        assert!(raw.muons.is_empty());
        assert_eq!(raw.electrons.len(), 1);
    }

    #[test]
    fn validate_rejects_negative_cut() {
        let sel = Preselection { jet_min_pt: -1.0, ..Preselection::default() };
        assert!(sel.validate().is_err());
    }
}
