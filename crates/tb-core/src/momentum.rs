//! Lorentz four-momentum and angular separations.
//!
//! Components are stored as `(px, py, pz, E)` in GeV. The derived kinematic
//! quantities follow collider conventions: the beam runs along `z`, `pt` is
//! the momentum transverse to it, `eta` is the pseudorapidity and `phi` the
//! azimuth in `(-π, π]`.

use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A Lorentz four-momentum `(px, py, pz, E)`.
///
/// Values are immutable once constructed; combining objects is done with `+`,
/// which is commutative and associative (up to floating-point rounding).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// x component of the momentum.
    pub px: f64,
    /// y component of the momentum.
    pub py: f64,
    /// z (beam axis) component of the momentum.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// Create a four-momentum from Cartesian components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Create a four-momentum from `(pt, eta, phi, mass)`.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = pt * pt + pz * pz;
        let e = (p2 + mass * mass).sqrt();
        Self { px, py, pz, e }
    }

    /// Squared transverse momentum.
    #[inline]
    pub fn pt2(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    /// Transverse momentum.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Magnitude of the three-momentum.
    #[inline]
    pub fn p(&self) -> f64 {
        (self.pt2() + self.pz * self.pz).sqrt()
    }

    /// Invariant mass squared `E² - |p|²`.
    #[inline]
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.pt2() - self.pz * self.pz
    }

    /// Invariant mass.
    ///
    /// A space-like vector (negative `mass2`, usually rounding on massless
    /// inputs) is reported as `-sqrt(-mass2)`, like ROOT's `TLorentzVector::M`.
    pub fn mass(&self) -> f64 {
        let m2 = self.mass2();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }

    /// Pseudorapidity `asinh(pz / pt)`.
    ///
    /// Infinite for momenta along the beam axis.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            return if self.pz >= 0.0 { f64::INFINITY } else { f64::NEG_INFINITY };
        }
        (self.pz / pt).asinh()
    }

    /// Absolute pseudorapidity.
    #[inline]
    pub fn abs_eta(&self) -> f64 {
        self.eta().abs()
    }

    /// Rapidity `0.5 * ln((E + pz) / (E - pz))`.
    pub fn rapidity(&self) -> f64 {
        0.5 * ((self.e + self.pz) / (self.e - self.pz)).ln()
    }

    /// Azimuthal angle in `(-π, π]`.
    #[inline]
    pub fn phi(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// `true` when all four components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.px.is_finite() && self.py.is_finite() && self.pz.is_finite() && self.e.is_finite()
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    #[inline]
    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

impl AddAssign for FourMomentum {
    #[inline]
    fn add_assign(&mut self, rhs: FourMomentum) {
        *self = *self + rhs;
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), Add::add)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a FourMomentum>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Azimuthal separation folded into `[0, π]`.
pub fn delta_phi(a: &FourMomentum, b: &FourMomentum) -> f64 {
    let mut dphi = (a.phi() - b.phi()).abs() % (2.0 * PI);
    if dphi > PI {
        dphi = 2.0 * PI - dphi;
    }
    dphi
}

/// Angular separation `sqrt(Δη² + Δφ²)` in pseudorapidity–azimuth space.
pub fn delta_r(a: &FourMomentum, b: &FourMomentum) -> f64 {
    let deta = a.eta() - b.eta();
    deta.hypot(delta_phi(a, b))
}
