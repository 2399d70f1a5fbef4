//! Sampler
//!
//! Draws the two toy sequences that carry the study's uncertainty: the number
//! of infections in the population and the number of fatalities.
//!
//! Each sequence has its own random stream, both derived from one master seed.
//! Drawing in batches therefore yields exactly the values a single full-length
//! draw would, whatever the batch size.

use crate::error::IfrError;
use crate::params::StudyParameters;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Binomial, Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Statistical model for the population infection count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingModel {
    /// Normal(infected * k, sqrt(tested * p * (1 - p)) * k) with `k = population / tested`
    #[serde(rename = "gaussian", alias = "gaussian-scaling")]
    GaussianScaling,
    /// Binomial(population, infected / tested)
    #[default]
    #[serde(rename = "binomial", alias = "binomial-resampling")]
    BinomialResampling,
}

impl std::str::FromStr for SamplingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" | "gaussian-scaling" | "normal" | "a" => Ok(SamplingModel::GaussianScaling),
            "binomial" | "binomial-resampling" | "b" => Ok(SamplingModel::BinomialResampling),
            other => Err(format!("Unknown sampling model: {}", other)),
        }
    }
}

impl std::fmt::Display for SamplingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingModel::GaussianScaling => write!(f, "gaussian"),
            SamplingModel::BinomialResampling => write!(f, "binomial"),
        }
    }
}

/// Sample mean and binomial standard error, both scaled from the tested sample to the population
fn gaussian_moments(params: &StudyParameters) -> (f64, f64) {
    let p = params.infection_rate();
    let scale = params.scale_factor();
    let sigma = (params.tested as f64 * p * (1.0 - p)).sqrt();
    (params.infected as f64 * scale, sigma * scale)
}

#[derive(Debug, Clone)]
enum InfectionDistribution {
    Gaussian(Normal<f64>),
    Binomial(Binomial),
}

impl InfectionDistribution {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            InfectionDistribution::Gaussian(normal) => normal.sample(rng),
            InfectionDistribution::Binomial(binomial) => binomial.sample(rng) as f64,
        }
    }
}

#[derive(Debug, Clone)]
enum FatalityDistribution {
    Poisson(Poisson<f64>),
    /// Poisson with mean zero; `rand_distr` rejects a zero rate
    Zero,
}

impl FatalityDistribution {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            FatalityDistribution::Poisson(poisson) => poisson.sample(rng),
            FatalityDistribution::Zero => 0.0,
        }
    }
}

/// Paired infection and fatality toys
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSequences {
    /// Infection-count toys
    pub infections: Vec<f64>,
    /// Fatality-count toys
    pub fatalities: Vec<f64>,
}

impl SampleSequences {
    /// Empty sequences with room for `capacity` toys each
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            infections: Vec::with_capacity(capacity),
            fatalities: Vec::with_capacity(capacity),
        }
    }

    /// Number of toy pairs
    pub fn len(&self) -> usize {
        self.infections.len()
    }

    /// Whether there are no toys
    pub fn is_empty(&self) -> bool {
        self.infections.is_empty()
    }

    /// Move the toys of `other` onto the end of these sequences
    pub fn append(&mut self, mut other: SampleSequences) {
        self.infections.append(&mut other.infections);
        self.fatalities.append(&mut other.fatalities);
    }
}

/// Draws toys for one study under one model
pub struct Sampler {
    params: StudyParameters,
    model: SamplingModel,
    infection: InfectionDistribution,
    fatality: FatalityDistribution,
    infection_rng: StdRng,
    fatality_rng: StdRng,
}

impl Sampler {
    /// Sampler seeded from OS entropy; results differ from run to run
    pub fn new(params: StudyParameters, model: SamplingModel) -> Result<Self, IfrError> {
        Self::with_master(params, model, StdRng::from_entropy())
    }

    /// Sampler whose toys are fully determined by `seed`
    pub fn seeded(
        params: StudyParameters,
        model: SamplingModel,
        seed: u64,
    ) -> Result<Self, IfrError> {
        Self::with_master(params, model, StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, entropy otherwise
    pub fn with_seed(
        params: StudyParameters,
        model: SamplingModel,
        seed: Option<u64>,
    ) -> Result<Self, IfrError> {
        match seed {
            Some(seed) => Self::seeded(params, model, seed),
            None => Self::new(params, model),
        }
    }

    fn with_master(
        params: StudyParameters,
        model: SamplingModel,
        mut master: StdRng,
    ) -> Result<Self, IfrError> {
        params.validate()?;

        let p = params.infection_rate();
        let infection = match model {
            SamplingModel::GaussianScaling => {
                let (mean, std_dev) = gaussian_moments(&params);
                debug!(mean, std_dev, scale = params.scale_factor(), "gaussian infection model");
                let normal = Normal::new(mean, std_dev)
                    .map_err(|e| IfrError::invalid(format!("gaussian model: {}", e)))?;
                InfectionDistribution::Gaussian(normal)
            }
            SamplingModel::BinomialResampling => {
                debug!(n = params.population, p, "binomial infection model");
                let binomial = Binomial::new(params.population, p)
                    .map_err(|e| IfrError::invalid(format!("binomial model: {}", e)))?;
                InfectionDistribution::Binomial(binomial)
            }
        };

        let fatality = if params.fatal == 0 {
            FatalityDistribution::Zero
        } else {
            let mean = params.fatal as f64;
            debug!(mean, "poisson fatality model");
            let poisson = Poisson::new(mean)
                .map_err(|e| IfrError::invalid(format!("poisson model: {}", e)))?;
            FatalityDistribution::Poisson(poisson)
        };

        let infection_rng = StdRng::seed_from_u64(master.next_u64());
        let fatality_rng = StdRng::seed_from_u64(master.next_u64());

        Ok(Self {
            params,
            model,
            infection,
            fatality,
            infection_rng,
            fatality_rng,
        })
    }

    /// Parameters this sampler draws for
    pub fn params(&self) -> &StudyParameters {
        &self.params
    }

    /// Model in use
    pub fn model(&self) -> SamplingModel {
        self.model
    }

    /// Theoretical `(mean, std_dev)` of the infection toys
    pub fn infection_moments(&self) -> (f64, f64) {
        match self.model {
            SamplingModel::GaussianScaling => gaussian_moments(&self.params),
            SamplingModel::BinomialResampling => {
                let p = self.params.infection_rate();
                let n = self.params.population as f64;
                (n * p, (n * p * (1.0 - p)).sqrt())
            }
        }
    }

    /// Draw one infection toy
    pub fn draw_infection(&mut self) -> f64 {
        self.infection.sample(&mut self.infection_rng)
    }

    /// Draw one fatality toy
    pub fn draw_fatality(&mut self) -> f64 {
        self.fatality.sample(&mut self.fatality_rng)
    }

    /// Draw `count` toy pairs
    pub fn draw(&mut self, count: usize) -> SampleSequences {
        let infections = (0..count).map(|_| self.draw_infection()).collect();
        let fatalities = (0..count).map(|_| self.draw_fatality()).collect();
        SampleSequences {
            infections,
            fatalities,
        }
    }

    /// Draw all `trials` toy pairs at once
    pub fn sample(&mut self) -> SampleSequences {
        let trials = self.params.trial_count();
        self.draw(trials)
    }

    /// Draw the `trials` toy pairs in chunks of at most `batch_size`
    pub fn batches(&mut self, batch_size: usize) -> SampleBatches<'_> {
        let remaining = self.params.trial_count();
        SampleBatches {
            sampler: self,
            remaining,
            batch_size: batch_size.max(1),
        }
    }
}

/// Iterator returned by [`Sampler::batches`]
pub struct SampleBatches<'a> {
    sampler: &'a mut Sampler,
    remaining: usize,
    batch_size: usize,
}

impl Iterator for SampleBatches<'_> {
    type Item = SampleSequences;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let count = self.remaining.min(self.batch_size);
        self.remaining -= count;
        Some(self.sampler.draw(count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches = self.remaining.div_ceil(self.batch_size);
        (batches, Some(batches))
    }
}
