#![warn(missing_docs)]
//! IFR Monte-Carlo Statistical Engine
//!
//! Turns a sequence of Monte-Carlo toys into reportable numbers:
//! - Percentiles with linear interpolation between order statistics
//! - Mean and symmetric-tail confidence intervals (68.3% and 95%)
//! - Shape diagnostics (mean, sigma, extremes) with a streaming accumulator
//! - Histograms for the reporting sink
//! - Clopper-Pearson and Garwood intervals as analytic cross-checks

mod analytic;
mod histogram;
mod intervals;
mod percentiles;
mod summary;

pub use analytic::{AnalyticError, clopper_pearson, poisson_interval};
pub use histogram::Histogram;
pub use intervals::{
    ConfidenceInterval, IntervalError, IntervalSummary, NonFinitePolicy, extract_intervals,
    extract_intervals_in_place, interval_of_sorted,
};
pub use percentiles::{compute_percentile, percentile_of_sorted, sort_samples, tail_percentiles};
pub use summary::{RunningSummary, SampleSummary, compute_summary};

/// Confidence level of the "one sigma" interval
pub const CL68: f64 = 0.683;

/// Confidence level of the "two sigma" interval
pub const CL95: f64 = 0.950;
