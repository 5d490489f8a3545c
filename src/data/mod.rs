//! Data acquisition: FRED fetch, monthly normalization, and category alignment.

pub mod align;
pub mod fred;
pub mod resample;

pub use align::{align, CategoryTable, TableRow};
pub use fred::{FredClient, SeriesSource};
