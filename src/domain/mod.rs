//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - calendar keys and indicator enums (`Month`, `Category`, `Correlation`, `UnitMode`)
//! - per-indicator metadata (`SeriesDescriptor`) and its lookup table (`Catalog`)
//! - normalized monthly observations (`ObservationSeries`)

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
