//! # tb-hist
//!
//! Weighted 1D histograms for the ttbb analysis.
//!
//! Each histogram keeps per-bin Σw and Σw² for error propagation, explicit
//! underflow/overflow accumulators, and a [`FlowPolicy`] deciding whether
//! out-of-range entries also land in the edge bins. Histograms can be merged
//! (per-worker partial results), scaled by a global factor and converted to
//! a differential density by per-bin width division.
//!
//! ## Example
//!
//! ```
//! use tb_hist::{Binning, FlowPolicy, Histogram};
//!
//! let mut h = Histogram::book("m_bb", &Binning::edges(vec![0.0, 50.0, 100.0, 200.0]), FlowPolicy::Drop)
//!     .unwrap();
//! h.fill(75.0, 2.0).unwrap();
//! h.fill(250.0, 1.0).unwrap();
//! assert_eq!(h.sumw(), &[0.0, 2.0, 0.0]);
//! assert_eq!(h.overflow(), 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binning;
pub mod export;
pub mod histogram;

pub use binning::Binning;
pub use export::HistogramSnapshot;
pub use histogram::{FlowPolicy, Histogram};
