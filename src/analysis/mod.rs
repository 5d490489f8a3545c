//! Derived metrics over aligned tables.
//!
//! - latest change + trend status per series (`status`)
//! - order-of-magnitude chart grouping (`scale`)
//! - summary statistics and correlation (`stats`)

pub mod scale;
pub mod stats;
pub mod status;

pub use scale::*;
pub use stats::*;
pub use status::*;
