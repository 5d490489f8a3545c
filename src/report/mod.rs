//! Terminal reports: load overview, status dashboard, category summaries.

pub mod format;

pub use format::*;
