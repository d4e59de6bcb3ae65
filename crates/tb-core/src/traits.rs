//! Core traits for the ttbb analysis
//!
//! Jets and leptons are distinct types; selection and overlap code is
//! written against [`HasMomentum`] so it works for either kind.

use crate::momentum::{self, FourMomentum};

/// Anything carrying a reconstructed four-momentum.
pub trait HasMomentum {
    /// The object's four-momentum.
    fn momentum(&self) -> &FourMomentum;

    /// Transverse momentum.
    fn pt(&self) -> f64 {
        self.momentum().pt()
    }

    /// Pseudorapidity.
    fn eta(&self) -> f64 {
        self.momentum().eta()
    }

    /// Angular separation to another object.
    fn delta_r<O: HasMomentum + ?Sized>(&self, other: &O) -> f64 {
        momentum::delta_r(self.momentum(), other.momentum())
    }
}

impl HasMomentum for FourMomentum {
    fn momentum(&self) -> &FourMomentum {
        self
    }
}

/// Sort objects by descending transverse momentum (stable for equal pT).
pub fn sort_by_pt_desc<T: HasMomentum>(objects: &mut [T]) {
    objects.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged {
        p4: FourMomentum,
        tag: u8,
    }

    impl HasMomentum for Tagged {
        fn momentum(&self) -> &FourMomentum {
            &self.p4
        }
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mk = |pt: f64, tag| Tagged { p4: FourMomentum::new(pt, 0.0, 0.0, pt), tag };
        let mut objs = vec![mk(10.0, 0), mk(30.0, 1), mk(10.0, 2), mk(20.0, 3)];
        sort_by_pt_desc(&mut objs);
        let tags: Vec<u8> = objs.iter().map(|o| o.tag).collect();
        assert_eq!(tags, vec![1, 3, 0, 2]);
    }
}
