//! # tb-core
//!
//! Core types for the ttbb analysis: four-momenta, reconstructed physics
//! objects (jets, dressed leptons), the per-event record, and the shared
//! error type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod momentum;
pub mod objects;
pub mod traits;

pub use error::{Error, Result};
pub use momentum::{FourMomentum, delta_phi, delta_r};
pub use objects::{Event, Jet, Lepton, LeptonFlavour, validate_inputs};
pub use traits::{HasMomentum, sort_by_pt_desc};

/// Crate version, shared by the CLI `version` command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
