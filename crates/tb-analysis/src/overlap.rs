//! Lepton–jet overlap removal.

use tb_core::{HasMomentum, Jet, Lepton};

/// Leptons closer than this ΔR to any selected jet are discarded.
pub const OVERLAP_DELTA_R: f64 = 0.4;

/// Drop every object in `objects` that lies within `min_delta_r` of any
/// object in `reference`.
///
/// Reference objects are visited in order and matches are removed
/// immediately, so an object removed by one reference object is not tested
/// against later ones. Survivors keep their relative order; `reference` is
/// never modified.
pub fn discard_if_any_delta_r_less<T, R>(objects: &mut Vec<T>, reference: &[R], min_delta_r: f64)
where
    T: HasMomentum,
    R: HasMomentum,
{
    for r in reference {
        objects.retain(|o| o.delta_r(r) >= min_delta_r);
    }
}

/// Remove leptons overlapping selected jets (ΔR < [`OVERLAP_DELTA_R`]).
pub fn remove_overlapping_leptons(leptons: &mut Vec<Lepton>, jets: &[Jet]) {
    let before = leptons.len();
    discard_if_any_delta_r_less(leptons, jets, OVERLAP_DELTA_R);
    if leptons.len() != before {
        log::trace!("overlap removal dropped {} of {before} leptons", before - leptons.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tb_core::FourMomentum;

    fn p(pt: f64, eta: f64, phi: f64) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 0.0)
    }

    #[test]
    fn removes_only_overlapping_leptons() {
        let jets = vec![Jet::b(p(100.0, 0.0, 0.0)), Jet::light(p(50.0, 1.0, 2.0))];
        let mut leptons = vec![
            Lepton::muon(p(60.0, 0.1, 0.1)),      // ΔR ≈ 0.14 to jet 0
            Lepton::muon(p(40.0, -1.0, -1.0)),    // isolated
            Lepton::electron(p(35.0, 1.2, 2.2)),  // ΔR ≈ 0.28 to jet 1
            Lepton::electron(p(30.0, 0.0, 0.45)), // ΔR = 0.45, kept
        ];
        remove_overlapping_leptons(&mut leptons, &jets);
        assert_eq!(leptons.len(), 2);
        assert_eq!(leptons[0].momentum, p(40.0, -1.0, -1.0));
        assert_eq!(leptons[1].momentum, p(30.0, 0.0, 0.45));
    }

    #[test]
    fn jets_never_removed_and_leptons_do_not_remove_leptons() {
        let jets = vec![Jet::b(p(100.0, 2.0, 0.0))];
        let mut leptons = vec![Lepton::muon(p(60.0, 0.0, 0.0)), Lepton::electron(p(50.0, 0.0, 0.05))];
        remove_overlapping_leptons(&mut leptons, &jets);
        assert_eq!(leptons.len(), 2);
        assert_eq!(jets.len(), 1);
    }

    #[test]
    fn no_jets_keeps_everything() {
        let mut leptons = vec![Lepton::muon(p(60.0, 0.0, 0.0))];
        remove_overlapping_leptons(&mut leptons, &[]);
        assert_eq!(leptons.len(), 1);
    }

    fn arb_p4() -> impl Strategy<Value = FourMomentum> {
        (25.0f64..300.0, -2.5f64..2.5, -3.1f64..3.1).prop_map(|(pt, eta, phi)| p(pt, eta, phi))
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn survivors_are_isolated_and_removed_ones_overlap(
            jets in prop::collection::vec(arb_p4(), 0..8),
            leps in prop::collection::vec(arb_p4(), 0..5),
        ) {
            let jets: Vec<Jet> = jets.into_iter().map(Jet::light).collect();
            let original: Vec<Lepton> = leps.into_iter().map(Lepton::muon).collect();
            let mut leptons = original.clone();
            remove_overlapping_leptons(&mut leptons, &jets);

            for l in &leptons {
                for j in &jets {
                    prop_assert!(l.delta_r(j) >= OVERLAP_DELTA_R);
                }
            }
            for l in original.iter().filter(|l| !leptons.contains(l)) {
                prop_assert!(jets.iter().any(|j| l.delta_r(j) < OVERLAP_DELTA_R));
            }
        }
    }
}
