//! Input/output helpers.
//!
//! - catalog JSON read + validation (`catalog`)
//! - category table exports (CSV) (`export`)

pub mod catalog;
pub mod export;

pub use catalog::*;
pub use export::*;
