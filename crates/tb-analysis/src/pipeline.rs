//! The pure per-event pipeline: overlap → classify → pairs → observables.

use tb_core::{Error, Jet, Lepton, Result, validate_inputs};

use crate::classify::{Classification, Region, VetoReason, classify};
use crate::observables::Observables;
use crate::overlap::remove_overlapping_leptons;
use crate::pairs::PairCombinatorics;

/// What an event contributes to the histograms.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFills {
    /// Regions the event entered.
    pub regions: Vec<Region>,
    /// Observables shared by those regions.
    pub observables: Observables,
    /// Fill weight.
    pub weight: f64,
    /// Flags the regions were derived from.
    pub classification: Classification,
}

/// Result of processing one event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The event touches no histogram.
    Vetoed(VetoReason),
    /// The event fills the listed regions.
    Selected(RegionFills),
}

impl EventOutcome {
    /// Region fills, if the event was selected.
    pub fn fills(&self) -> Option<&RegionFills> {
        match self {
            EventOutcome::Selected(f) => Some(f),
            EventOutcome::Vetoed(_) => None,
        }
    }
}

/// Process one event without side effects.
///
/// `jets` are the selected jets ordered by descending pT; `leptons` the
/// dressed muons then electrons. Overlap removal works on a private copy of
/// the lepton list. Non-finite inputs are rejected before anything else, and
/// a selected event whose observables are not all finite is an error.
pub fn process_event(jets: &[Jet], leptons: &[Lepton], weight: f64) -> Result<EventOutcome> {
    validate_inputs(jets, leptons, weight)?;

    let mut leptons = leptons.to_vec();
    remove_overlapping_leptons(&mut leptons, jets);

    let classification = classify(jets, &leptons);
    if let Some(reason) = classification.veto() {
        return Ok(EventOutcome::Vetoed(reason));
    }

    let bjets: Vec<Jet> = jets.iter().filter(|j| j.b_tagged).copied().collect();
    let pairs = PairCombinatorics::scan(&bjets)?;
    let observables = Observables::compute(jets, &leptons, &bjets, &pairs, weight);
    // Finite but degenerate objects (pT = 0) give infinite η and ΔR.
    if let Some((observable, value)) = observables.first_non_finite() {
        return Err(Error::NonFinite(format!("observable {} = {value}", observable.stem())));
    }

    Ok(EventOutcome::Selected(RegionFills {
        regions: classification.regions(),
        observables,
        weight,
        classification,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_core::{Error, FourMomentum};

    fn jet(pt: f64, eta: f64, phi: f64, b: bool) -> Jet {
        Jet::new(FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 0.0), b)
    }

    fn four_jets() -> Vec<Jet> {
        vec![
            jet(100.0, 0.0, 0.0, true),
            jet(80.0, 0.5, 1.5, true),
            jet(60.0, -0.5, 3.0, true),
            jet(40.0, 1.0, -1.5, false),
        ]
    }

    #[test]
    fn overlapping_lepton_is_removed_before_classification() {
        // The only lepton sits on top of the hardest jet, so no channel remains.
        let leptons = vec![Lepton::muon(FourMomentum::from_pt_eta_phi_m(50.0, 0.05, 0.05, 0.0))];
        let out = process_event(&four_jets(), &leptons, 1.0).unwrap();
        assert_eq!(out, EventOutcome::Vetoed(VetoReason::NoLeptonChannel));
    }

    #[test]
    fn isolated_lepton_selects_3b() {
        let leptons = vec![Lepton::electron(FourMomentum::from_pt_eta_phi_m(50.0, -2.0, -2.5, 0.0))];
        let out = process_event(&four_jets(), &leptons, 0.5).unwrap();
        let fills = out.fills().unwrap();
        assert_eq!(fills.regions.len(), 1);
        assert_eq!(fills.regions[0].name(), "3b_geq4j_ljets");
        assert_eq!(fills.weight, 0.5);
    }

    #[test]
    fn non_finite_input_aborts() {
        let mut jets = four_jets();
        jets[2].momentum.e = f64::NAN;
        let err = process_event(&jets, &[], 1.0).unwrap_err();
        assert!(matches!(err, Error::NonFinite(_)));
    }

    #[test]
    fn zero_pt_bjet_is_rejected() {
        let mut jets = four_jets();
        jets.push(Jet::b(FourMomentum::new(0.0, 0.0, 50.0, 50.0)));
        let leptons = vec![Lepton::electron(FourMomentum::from_pt_eta_phi_m(50.0, -2.0, -2.5, 0.0))];
        let err = process_event(&jets, &leptons, 1.0).unwrap_err();
        assert!(matches!(&err, Error::NonFinite(msg) if msg.contains("dR_bb")), "{err}");
    }

    #[test]
    fn caller_leptons_are_untouched() {
        let leptons = vec![Lepton::muon(FourMomentum::from_pt_eta_phi_m(50.0, 0.05, 0.05, 0.0))];
        let before = leptons.clone();
        let _ = process_event(&four_jets(), &leptons, 1.0).unwrap();
        assert_eq!(leptons, before);
    }
}
