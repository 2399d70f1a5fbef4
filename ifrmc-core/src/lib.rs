#![warn(missing_docs)]
//! IFR Monte-Carlo Core
//!
//! Propagates the uncertainty of a small serological study into a distribution
//! over the infection fatality rate:
//! - `StudyParameters`: the five counts that define a run
//! - `Sampler`: infection toys (Gaussian scaling or binomial resampling) and
//!   Poisson fatality toys, from an explicit and optionally seeded generator
//! - Ratio estimator: positional `fatalities[i] / infections[i]`
//! - `run`: validation, batched sampling, ratios and interval extraction
//! - `AnalyticReference`: Clopper-Pearson and Garwood cross-checks

mod engine;
mod error;
mod params;
mod ratio;
mod reference;
mod sampler;

pub use engine::{DEFAULT_BATCH_SIZE, Estimate, RunConfig, run, run_with_progress};
pub use error::IfrError;
pub use params::StudyParameters;
pub use ratio::{estimate_ratios, extend_ratios, ratio};
pub use reference::AnalyticReference;
pub use sampler::{SampleBatches, SampleSequences, Sampler, SamplingModel};
