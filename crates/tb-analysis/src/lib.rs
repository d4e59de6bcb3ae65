//! # tb-analysis
//!
//! Per-event selection and histogramming for tt̄ + b-jets final states.
//!
//! The pipeline, evaluated once per event:
//!
//! ```text
//! RawEvent ─ preselect ─▶ Event
//!   │ overlap   leptons within ΔR < 0.4 of a jet are dropped
//!   │ classify  lepton channel × b-jet multiplicity bucket (or veto)
//!   │ pairs     closest / leading / highest vector-pT b-jet pairs, mean ΔR
//!   │ observe   HT sums, pair masses, ranked b-jet pT, weight diagnostics
//!   ▼
//! RegionFills ─ HistogramSet::fill_event ─▶ (merge) ─ finalize ─▶ snapshots
//! ```
//!
//! [`process_event`] is pure; [`HistogramSet`] owns every booked histogram
//! and [`Analysis`] drives a whole run (sum of weights, cutflow, optional
//! worker-parallel filling, single normalization pass).
//!
//! ## Example
//!
//! ```
//! use tb_analysis::{Analysis, AnalysisConfig};
//! use tb_core::{Event, FourMomentum, Jet, Lepton};
//!
//! let jet = |pt: f64, phi: f64, b| Jet::new(FourMomentum::from_pt_eta_phi_m(pt, 0.0, phi, 0.0), b);
//! let event = Event::new(
//!     vec![jet(100.0, 0.0, true), jet(80.0, 1.2, true), jet(60.0, 2.4, true), jet(40.0, -2.0, false)],
//!     vec![Lepton::muon(FourMomentum::from_pt_eta_phi_m(30.0, 1.5, -1.0, 0.0))],
//!     1.0,
//! );
//!
//! let mut analysis = Analysis::new(AnalysisConfig::default()).unwrap();
//! analysis.analyze(&event).unwrap();
//! let summary = analysis.finalize(1.0, None).unwrap();
//! assert_eq!(summary.cutflow.selected["3b_geq4j_ljets"], 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod catalogue;
pub mod classify;
pub mod config;
pub mod cutflow;
pub mod normalize;
pub mod observables;
pub mod overlap;
pub mod pairs;
pub mod pipeline;
pub mod preselect;
pub mod run;

pub use aggregator::HistogramSet;
pub use catalogue::{HistKey, Observable};
pub use classify::{BJetBucket, Classification, LeptonChannel, Region, VetoReason, classify};
pub use config::{AnalysisConfig, WeightBinning};
pub use cutflow::Cutflow;
pub use normalize::{NormalizedHistograms, Normalization};
pub use observables::{Observables, PairObservables};
pub use overlap::{OVERLAP_DELTA_R, remove_overlapping_leptons};
pub use pairs::PairCombinatorics;
pub use pipeline::{EventOutcome, RegionFills, process_event};
pub use preselect::{Preselection, RawEvent};
pub use run::{Analysis, RunSummary};
pub use tb_hist::FlowPolicy;
