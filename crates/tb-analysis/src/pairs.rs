//! b-jet pair combinatorics.
//!
//! All searches walk the ordered pairs `(i, j)`, `i` outer and `j` inner,
//! ascending, skipping `i == j`. Comparisons are strict, so among equal
//! candidates the first one met in that scan wins. The scan is O(n²) in the
//! number of b-jets, which is small (typically 3–10).

use tb_core::{Error, HasMomentum, Jet, Result};

/// Pair choices and the mean separation for one event's b-jets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCombinatorics {
    /// Pair with the smallest ΔR, as `(i, j)` in scan order.
    pub closest: (usize, usize),
    /// The two highest-pT b-jets, always `(0, 1)`.
    pub leading: (usize, usize),
    /// Pair whose summed momentum has the largest pT, as `(i, j)` in scan order.
    pub highest_vector_pt: (usize, usize),
    /// Mean ΔR over all ordered pairs (each unordered pair counted twice).
    pub mean_delta_r: f64,
}

impl PairCombinatorics {
    /// Scan the b-jets, which must be ordered by descending pT.
    ///
    /// Fails if fewer than two b-jets are given.
    pub fn scan(bjets: &[Jet]) -> Result<Self> {
        let n = bjets.len();
        if n < 2 {
            return Err(Error::Computation(format!(
                "pair combinatorics needs at least 2 b-jets, got {n}"
            )));
        }

        let mut closest = (0, 1);
        let mut min_dr = f64::INFINITY;
        let mut highest_vector_pt = (0, 1);
        let mut max_pt = f64::NEG_INFINITY;
        let mut dr_sum = 0.0;
        let mut n_pairs = 0usize;

        for (i, bi) in bjets.iter().enumerate() {
            for (j, bj) in bjets.iter().enumerate() {
                if i == j {
                    continue;
                }
                let dr = bi.delta_r(bj);
                if dr < min_dr {
                    min_dr = dr;
                    closest = (i, j);
                }
                let pt = (bi.momentum + bj.momentum).pt();
                if pt > max_pt {
                    max_pt = pt;
                    highest_vector_pt = (i, j);
                }
                dr_sum += dr;
                n_pairs += 1;
            }
        }

        if n_pairs == 0 {
            return Err(Error::Computation("no b-jet pairs to average over".into()));
        }

        Ok(Self { closest, leading: (0, 1), highest_vector_pt, mean_delta_r: dr_sum / n_pairs as f64 })
    }
}
