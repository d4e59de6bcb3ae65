//! Event bookkeeping: processed weight, vetoes and per-region selections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{Region, VetoReason};
use crate::pipeline::EventOutcome;

/// Running counts for a run or one worker's share of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cutflow {
    /// Events seen (including vetoed ones).
    pub events: u64,
    /// Σ weight over every event seen.
    pub sum_of_weights: f64,
    /// Vetoed events per reason.
    pub vetoed: BTreeMap<VetoReason, u64>,
    /// Selected events per region name.
    pub selected: BTreeMap<String, u64>,
}

impl Cutflow {
    /// An empty cutflow with every region listed at zero.
    pub fn new() -> Self {
        Self {
            selected: Region::ALL.iter().map(|r| (r.name(), 0)).collect(),
            ..Self::default()
        }
    }

    /// Record the weight of an event before its outcome is known.
    pub fn record_event(&mut self, weight: f64) {
        self.events += 1;
        self.sum_of_weights += weight;
    }

    /// Record an event's outcome.
    pub fn record_outcome(&mut self, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Vetoed(reason) => *self.vetoed.entry(*reason).or_default() += 1,
            EventOutcome::Selected(fills) => {
                for region in &fills.regions {
                    *self.selected.entry(region.name()).or_default() += 1;
                }
            }
        }
    }

    /// Add another cutflow into this one.
    pub fn merge(&mut self, other: &Cutflow) {
        self.events += other.events;
        self.sum_of_weights += other.sum_of_weights;
        for (reason, n) in &other.vetoed {
            *self.vetoed.entry(*reason).or_default() += n;
        }
        for (region, n) in &other.selected {
            *self.selected.entry(region.clone()).or_default() += n;
        }
    }

    /// Total vetoed events.
    pub fn n_vetoed(&self) -> u64 {
        self.vetoed.values().sum()
    }
}
