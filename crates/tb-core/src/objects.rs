//! Reconstructed physics objects and the per-event record.
//!
//! Objects are produced by external collaborators (jet clustering with
//! b-tagging, lepton dressing) and are read-only for the analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::momentum::FourMomentum;
use crate::traits::HasMomentum;

/// A clustered jet with its b-tagging decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    /// Jet four-momentum.
    #[serde(flatten)]
    pub momentum: FourMomentum,
    /// Whether the jet was identified as originating from a b quark.
    #[serde(default)]
    pub b_tagged: bool,
}

impl Jet {
    /// Create a jet.
    pub fn new(momentum: FourMomentum, b_tagged: bool) -> Self {
        Self { momentum, b_tagged }
    }

    /// Create a b-tagged jet.
    pub fn b(momentum: FourMomentum) -> Self {
        Self::new(momentum, true)
    }

    /// Create a light (untagged) jet.
    pub fn light(momentum: FourMomentum) -> Self {
        Self::new(momentum, false)
    }
}

impl HasMomentum for Jet {
    fn momentum(&self) -> &FourMomentum {
        &self.momentum
    }
}

/// Charged-lepton flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeptonFlavour {
    /// Muon.
    Muon,
    /// Electron.
    Electron,
}

/// A dressed lepton (bare lepton plus nearby bremsstrahlung photons).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lepton {
    /// Dressed four-momentum.
    #[serde(flatten)]
    pub momentum: FourMomentum,
    /// Lepton flavour.
    pub flavour: LeptonFlavour,
}

impl Lepton {
    /// Create a dressed muon.
    pub fn muon(momentum: FourMomentum) -> Self {
        Self { momentum, flavour: LeptonFlavour::Muon }
    }

    /// Create a dressed electron.
    pub fn electron(momentum: FourMomentum) -> Self {
        Self { momentum, flavour: LeptonFlavour::Electron }
    }
}

impl HasMomentum for Lepton {
    fn momentum(&self) -> &FourMomentum {
        &self.momentum
    }
}

/// One collision event as seen by the analysis core.
///
/// `jets` are ordered by descending pT. `leptons` hold the muons followed by
/// the electrons, each sub-list ordered by descending pT; the combined list
/// is deliberately not re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Selected jets.
    pub jets: Vec<Jet>,
    /// Selected dressed leptons.
    pub leptons: Vec<Lepton>,
    /// Event weight (signed).
    pub weight: f64,
}

impl Event {
    /// Create an event.
    pub fn new(jets: Vec<Jet>, leptons: Vec<Lepton>, weight: f64) -> Self {
        Self { jets, leptons, weight }
    }

    /// Reject non-finite momenta and weights, naming the first offender.
    pub fn validate(&self) -> Result<()> {
        validate_inputs(&self.jets, &self.leptons, self.weight)
    }
}

/// Reject non-finite momenta and weights, naming the first offender.
pub fn validate_inputs(jets: &[Jet], leptons: &[Lepton], weight: f64) -> Result<()> {
    if !weight.is_finite() {
        return Err(Error::NonFinite(format!("event weight = {weight}")));
    }
    if let Some((i, j)) = jets.iter().enumerate().find(|(_, j)| !j.momentum.is_finite()) {
        return Err(Error::NonFinite(format!("jet {i} has momentum {:?}", j.momentum)));
    }
    if let Some((i, l)) = leptons.iter().enumerate().find(|(_, l)| !l.momentum.is_finite()) {
        return Err(Error::NonFinite(format!(
            "lepton {i} ({:?}) has momentum {:?}",
            l.flavour, l.momentum
        )));
    }
    Ok(())
}
