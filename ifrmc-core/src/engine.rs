//! Estimation Engine
//!
//! Runs the whole pipeline for one study:
//!
//! ```text
//! StudyParameters ──validate──▶ Sampler ──toys──▶ Ratio Estimator ──▶ Interval Extractor
//!                                  │                                        │
//!                                  └── running diagnostics ──▶ Estimate ◀───┘
//! ```
//!
//! Toys are drawn in batches. Infection and fatality sequences are only kept
//! at full length when [`RunConfig::retain_samples`] asks for them. The ratio
//! sequence is always kept since intervals need all of it; it is sorted in
//! place for extraction, so [`Estimate::ratios`] comes back in ascending order.

use crate::error::IfrError;
use crate::params::StudyParameters;
use crate::ratio::extend_ratios;
use crate::sampler::{SampleSequences, Sampler, SamplingModel};
use ifrmc_stats::{
    IntervalSummary, NonFinitePolicy, RunningSummary, SampleSummary, extract_intervals_in_place,
};
use tracing::{debug, info, warn};

/// Batch size used when none is configured
pub const DEFAULT_BATCH_SIZE: usize = 1 << 16;

/// Everything that shapes one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Study counts and toy count
    pub params: StudyParameters,
    /// Infection model
    pub model: SamplingModel,
    /// Fixed seed for reproducible toys; entropy when `None`
    pub seed: Option<u64>,
    /// Handling of NaN and infinite ratios before interval extraction
    pub non_finite: NonFinitePolicy,
    /// Toys drawn per batch
    pub batch_size: usize,
    /// Keep the full infection and fatality sequences in the result
    pub retain_samples: bool,
}

impl RunConfig {
    /// Defaults: entropy seed, propagate non-finite ratios, samples not retained
    pub fn new(params: StudyParameters, model: SamplingModel) -> Self {
        Self {
            params,
            model,
            seed: None,
            non_finite: NonFinitePolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            retain_samples: false,
        }
    }

    /// Use a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the non-finite policy
    pub fn with_non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    /// Set the batch size (clamped to at least one)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Keep the infection and fatality sequences
    pub fn retaining_samples(mut self) -> Self {
        self.retain_samples = true;
        self
    }
}

/// Result of one run
#[derive(Debug, Clone)]
pub struct Estimate {
    /// Parameters the run used
    pub params: StudyParameters,
    /// Model the run used
    pub model: SamplingModel,
    /// Seed, if the run was reproducible
    pub seed: Option<u64>,
    /// Non-finite policy applied before extraction
    pub non_finite: NonFinitePolicy,
    /// IFR mean and intervals, as fractions
    pub summary: IntervalSummary,
    /// Diagnostics of the infection toys
    pub infections: SampleSummary,
    /// Diagnostics of the fatality toys
    pub fatalities: SampleSummary,
    /// Diagnostics of the ratio toys
    pub ratio_stats: SampleSummary,
    /// IFR toys sorted ascending under the total order, non-finite ones included
    pub ratios: Vec<f64>,
    /// Infection and fatality toys, when retained
    pub samples: Option<SampleSequences>,
}

/// Run an estimation
pub fn run(config: &RunConfig) -> Result<Estimate, IfrError> {
    run_with_progress(config, |_| {})
}

/// Run an estimation, reporting the number of toys drawn after every batch
pub fn run_with_progress<F>(config: &RunConfig, mut progress: F) -> Result<Estimate, IfrError>
where
    F: FnMut(u64),
{
    config.params.validate()?;

    let mut sampler = Sampler::with_seed(config.params, config.model, config.seed)?;
    let trials = config.params.trial_count();

    info!(
        model = %config.model,
        trials,
        seed = ?config.seed,
        "drawing toys"
    );

    let mut infections = RunningSummary::new();
    let mut fatalities = RunningSummary::new();
    let mut ratios = Vec::with_capacity(trials);
    let mut retained = config
        .retain_samples
        .then(|| SampleSequences::with_capacity(trials));

    for batch in sampler.batches(config.batch_size) {
        infections.extend(&batch.infections);
        fatalities.extend(&batch.fatalities);
        extend_ratios(&mut ratios, &batch.fatalities, &batch.infections);

        if let Some(retained) = retained.as_mut() {
            retained.append(batch);
        }
        progress(ratios.len() as u64);
    }

    let infections = infections.finish();
    let fatalities = fatalities.finish();
    let ratio_stats = ifrmc_stats::compute_summary(&ratios);

    debug!(
        mean = infections.mean,
        sigma = infections.std_dev,
        "infection toys"
    );
    debug!(
        mean = fatalities.mean,
        sigma = fatalities.std_dev,
        "fatality toys"
    );

    if ratio_stats.non_finite > 0 {
        warn!(
            non_finite = ratio_stats.non_finite,
            policy = %config.non_finite,
            "ratio toys with zero infections"
        );
    }

    let summary = extract_intervals_in_place(&mut ratios, config.non_finite)?;

    info!(
        mean = summary.mean,
        ci68_lower = summary.ci68.lower,
        ci68_upper = summary.ci68.upper,
        ci95_lower = summary.ci95.lower,
        ci95_upper = summary.ci95.upper,
        "intervals extracted"
    );

    Ok(Estimate {
        params: config.params,
        model: config.model,
        seed: config.seed,
        non_finite: config.non_finite,
        summary,
        infections,
        fatalities,
        ratio_stats,
        ratios,
        samples: retained,
    })
}
