//! Run driver: feeds events through the pipeline, keeps the bookkeeping and
//! normalizes once at the end.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tb_core::{Event, Result};
use tb_hist::HistogramSnapshot;

use crate::aggregator::HistogramSet;
use crate::config::AnalysisConfig;
use crate::cutflow::Cutflow;
use crate::normalize::Normalization;
use crate::pipeline::{EventOutcome, process_event};
use crate::preselect::RawEvent;

/// Everything a finished run exposes for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cross section used for normalization (pb).
    pub cross_section_pb: f64,
    /// Sum of weights used for normalization.
    pub sum_of_weights: f64,
    /// `cross_section_pb / sum_of_weights`.
    pub scale_factor: f64,
    /// Event bookkeeping.
    pub cutflow: Cutflow,
    /// Normalized histograms by name.
    pub histograms: BTreeMap<String, HistogramSnapshot>,
}

/// One analysis run.
///
/// Histograms are filled during [`Analysis::analyze`] (or the batch
/// variants) and normalized by [`Analysis::finalize`], which consumes the
/// run so normalization happens exactly once.
pub struct Analysis {
    config: AnalysisConfig,
    histograms: HistogramSet,
    cutflow: Cutflow,
}

impl Analysis {
    /// Validate the configuration and book the histogram catalogue.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let histograms = HistogramSet::book(&config)?;
        Ok(Self { config, histograms, cutflow: Cutflow::new() })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Histograms filled so far (not normalized).
    pub fn histograms(&self) -> &HistogramSet {
        &self.histograms
    }

    /// Bookkeeping so far.
    pub fn cutflow(&self) -> &Cutflow {
        &self.cutflow
    }

    /// Process one preselected event.
    pub fn analyze(&mut self, event: &Event) -> Result<EventOutcome> {
        let outcome = process_event(&event.jets, &event.leptons, event.weight)?;
        if let EventOutcome::Selected(fills) = &outcome {
            self.histograms.fill_event(fills)?;
        }
        self.cutflow.record_event(event.weight);
        self.cutflow.record_outcome(&outcome);
        Ok(outcome)
    }

    /// Preselect and process one raw event.
    pub fn analyze_raw(&mut self, raw: &RawEvent) -> Result<EventOutcome> {
        let event = self.config.preselection.apply(raw)?;
        self.analyze(&event)
    }

    /// Process a batch of raw events on the rayon pool.
    ///
    /// Each worker fills its own histogram set and cutflow; the partial
    /// results are merged and then added to this run. On error nothing from
    /// the batch is kept.
    pub fn analyze_batch_parallel(&mut self, events: &[RawEvent]) -> Result<()> {
        let config = &self.config;
        let empty = self.empty_partial()?;

        let (histograms, cutflow) = events
            .par_iter()
            .try_fold(
                || empty.clone(),
                |(mut hists, mut cutflow), raw| -> Result<(HistogramSet, Cutflow)> {
                    let event = config.preselection.apply(raw)?;
                    let outcome = process_event(&event.jets, &event.leptons, event.weight)?;
                    cutflow.record_event(event.weight);
                    cutflow.record_outcome(&outcome);
                    if let EventOutcome::Selected(fills) = &outcome {
                        hists.fill_event(fills)?;
                    }
                    Ok((hists, cutflow))
                },
            )
            .try_reduce(
                || empty.clone(),
                |(mut hists, mut cutflow), (other_hists, other_cutflow)| {
                    hists.merge(&other_hists)?;
                    cutflow.merge(&other_cutflow);
                    Ok((hists, cutflow))
                },
            )?;

        self.histograms.merge(&histograms)?;
        self.cutflow.merge(&cutflow);
        Ok(())
    }

    /// Process a batch of raw events in order on the current thread.
    pub fn analyze_batch(&mut self, events: &[RawEvent]) -> Result<()> {
        for raw in events {
            self.analyze_raw(raw)?;
        }
        Ok(())
    }

    /// Fold a partial result produced elsewhere (e.g. another process).
    pub fn merge_partial(&mut self, histograms: &HistogramSet, cutflow: &Cutflow) -> Result<()> {
        self.histograms.merge(histograms)?;
        self.cutflow.merge(cutflow);
        Ok(())
    }

    fn empty_partial(&self) -> Result<(HistogramSet, Cutflow)> {
        Ok((HistogramSet::book(&self.config)?, Cutflow::new()))
    }

    /// Normalize and export.
    ///
    /// The sum of weights defaults to the one accumulated over every event
    /// seen; `sum_of_weights` overrides it (e.g. when the input is a slice
    /// of a larger sample).
    pub fn finalize(self, cross_section_pb: f64, sum_of_weights: Option<f64>) -> Result<RunSummary> {
        let sum_of_weights = sum_of_weights.unwrap_or(self.cutflow.sum_of_weights);
        log::debug!(
            "run complete: {} events, {} vetoed, selected {:?}",
            self.cutflow.events,
            self.cutflow.n_vetoed(),
            self.cutflow.selected
        );
        let norm = Normalization { cross_section_pb, sum_of_weights };
        let normalized = self.histograms.finalize(&norm)?;
        Ok(RunSummary {
            cross_section_pb,
            sum_of_weights,
            scale_factor: normalized.scale_factor,
            cutflow: self.cutflow,
            histograms: normalized.histograms,
        })
    }
}
