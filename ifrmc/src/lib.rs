#![warn(missing_docs)]
//! # ifrmc
//!
//! Monte-Carlo estimation of the infection fatality rate (IFR) from a small
//! serological study: `tested` people drawn from a `population`, `infected` of
//! them positive, `fatal` deaths counted across the whole population.
//!
//! The estimator propagates both uncertainties into a distribution over the IFR:
//! - **Infections**: Gaussian scaling of the sample rate, or binomial resampling
//!   of the whole population
//! - **Fatalities**: Poisson around the observed count
//! - **Intervals**: mean plus central 68.3 % and 95 % percentile intervals
//! - **Cross-check**: Clopper-Pearson and Garwood closed-form intervals
//!
//! ## Quick Start
//!
//! ```no_run
//! use ifrmc::prelude::*;
//!
//! let params = StudyParameters::new(12_597, 919, 138, 7, 1_000_000)?;
//! let estimate = run(&RunConfig::new(params, SamplingModel::BinomialResampling).with_seed(42))?;
//! let pct = estimate.summary.to_percent();
//! println!("IFR = {:.3} % [{:.3}, {:.3}]", pct.mean, pct.ci95.lower, pct.ci95.upper);
//! # Ok::<(), ifrmc::IfrError>(())
//! ```

// Re-export core types
pub use ifrmc_core::{
    AnalyticReference, DEFAULT_BATCH_SIZE, Estimate, IfrError, RunConfig, SampleBatches,
    SampleSequences, Sampler, SamplingModel, StudyParameters, estimate_ratios, extend_ratios,
    ratio, run as estimate, run_with_progress,
};

// Re-export stats
pub use ifrmc_stats::{
    CL68, CL95, ConfidenceInterval, Histogram, IntervalError, IntervalSummary, NonFinitePolicy,
    RunningSummary, SampleSummary, clopper_pearson, compute_percentile, compute_summary,
    extract_intervals, extract_intervals_in_place, poisson_interval, tail_percentiles,
};

// Re-export report types
pub use ifrmc_report::{
    OutputFormat, Report, generate_csv_report, generate_json_report, parse_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Estimate, IfrError, IntervalSummary, NonFinitePolicy, RunConfig, Sampler,
        SamplingModel, StudyParameters, estimate_ratios, extract_intervals,
    };
    pub use ifrmc_core::run;
}

/// Run the ifrmc command-line interface.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     ifrmc::run()
/// }
/// ```
pub use ifrmc_cli::run;
