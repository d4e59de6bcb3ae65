//! Owned set of every booked histogram, indexed by [`HistKey`].

use tb_core::{Error, Result};
use tb_hist::Histogram;

use crate::catalogue::{HistKey, Observable};
use crate::config::AnalysisConfig;
use crate::pipeline::RegionFills;

/// All histograms of one run (or one worker's share of it).
///
/// The catalogue is booked once in [`HistogramSet::book`]; afterwards the
/// set only changes through fills, merges and the final normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSet {
    hists: Vec<Histogram>,
}

impl HistogramSet {
    /// Book one histogram per (region, observable) key.
    pub fn book(config: &AnalysisConfig) -> Result<Self> {
        let hists = HistKey::all()
            .map(|key| {
                let binning = key.observable.binning(&config.weight_histogram);
                Histogram::book(key.name(), &binning, config.flow_policy)
                    .map(|h| h.with_density(key.observable.is_density()))
            })
            .collect::<Result<Vec<_>>>()?;
        debug_assert_eq!(hists.len(), HistKey::COUNT);
        Ok(Self { hists })
    }

    /// Histogram for `key`.
    pub fn get(&self, key: HistKey) -> &Histogram {
        &self.hists[key.index()]
    }

    /// Number of booked histograms.
    pub fn len(&self) -> usize {
        self.hists.len()
    }

    /// `true` if no histogram is booked.
    pub fn is_empty(&self) -> bool {
        self.hists.is_empty()
    }

    /// Iterate `(key, histogram)` in booking order.
    pub fn iter(&self) -> impl Iterator<Item = (HistKey, &Histogram)> {
        HistKey::all().zip(&self.hists)
    }

    /// Add `weight` at `value` to the histogram for `key`.
    pub fn fill(&mut self, key: HistKey, value: f64, weight: f64) -> Result<()> {
        self.hists[key.index()].fill(value, weight)
    }

    /// Fill every observable of every region the event entered.
    pub fn fill_event(&mut self, fills: &RegionFills) -> Result<()> {
        for &region in &fills.regions {
            for observable in Observable::ALL {
                let key = HistKey::new(region, observable);
                for &value in fills.observables.values(observable) {
                    self.fill(key, value, fills.weight)?;
                }
            }
        }
        Ok(())
    }

    /// Add another set into this one, histogram by histogram.
    pub fn merge(&mut self, other: &HistogramSet) -> Result<()> {
        if self.hists.len() != other.hists.len() {
            return Err(Error::Histogram(format!(
                "cannot merge histogram sets of size {} and {}",
                self.hists.len(),
                other.hists.len()
            )));
        }
        for (a, b) in self.hists.iter_mut().zip(&other.hists) {
            a.merge(b)?;
        }
        log::debug!("merged histogram set ({} histograms)", self.hists.len());
        Ok(())
    }

    pub(crate) fn into_histograms(self) -> Vec<Histogram> {
        self.hists
    }
}
