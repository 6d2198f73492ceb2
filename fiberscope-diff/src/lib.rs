#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Structural diffing of inspected values.
//!
//! [`diff`] walks two [`Value`](fiberscope_value::Value)s side by side and
//! reports every leaf that differs, naming it by a
//! [`ValuePath`](fiberscope_path::ValuePath). Functions are compared by
//! source text so a callback recreated on every render shows up as "same
//! function" instead of a real change. Cycles are cut the second time both
//! sides have been seen and reported with a [`CIRCULAR`] marker.
//!
//! [`DiffReport`] turns a result into text; [`AggregatedChanges`] keeps a tally
//! across renders.

#[macro_use]
mod tracing_macros;

mod diff;
mod report;
mod theme;

pub use diff::{CIRCULAR, DiffChange, DiffResult, DiffShape, diff, diff_at, functions_equal};
pub use report::{AggregatedChange, AggregatedChanges, DiffReport, ReportOptions};
