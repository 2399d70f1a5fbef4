//! Configuration loading from ifr.toml
//!
//! A study can be described in an `ifr.toml` file. The file is discovered by
//! walking up from the current directory; every field is optional and falls
//! back to the published reference study.

use ifrmc_core::{DEFAULT_BATCH_SIZE, SamplingModel, StudyParameters};
use ifrmc_stats::NonFinitePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked for by [`IfrConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "ifr.toml";

/// Estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IfrConfig {
    /// Study counts
    #[serde(default)]
    pub study: StudyConfig,
    /// Sampling configuration
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Histogram layouts
    #[serde(default)]
    pub histograms: HistogramConfig,
}

/// The five study counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Population the fatalities were counted in
    #[serde(default = "default_population")]
    pub population: u64,
    /// Individuals tested
    #[serde(default = "default_tested")]
    pub tested: u64,
    /// Positives among the tested
    #[serde(default = "default_infected")]
    pub infected: u64,
    /// Fatalities in the population
    #[serde(default = "default_fatal")]
    pub fatal: u64,
    /// Monte-Carlo toys to draw
    #[serde(default = "default_trials")]
    pub trials: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            population: default_population(),
            tested: default_tested(),
            infected: default_infected(),
            fatal: default_fatal(),
            trials: default_trials(),
        }
    }
}

impl StudyConfig {
    /// Unvalidated study parameters
    pub fn params(&self) -> StudyParameters {
        StudyParameters {
            population: self.population,
            tested: self.tested,
            infected: self.infected,
            fatal: self.fatal,
            trials: self.trials,
        }
    }
}

fn default_population() -> u64 {
    StudyParameters::REFERENCE.population
}
fn default_tested() -> u64 {
    StudyParameters::REFERENCE.tested
}
fn default_infected() -> u64 {
    StudyParameters::REFERENCE.infected
}
fn default_fatal() -> u64 {
    StudyParameters::REFERENCE.fatal
}
fn default_trials() -> u64 {
    StudyParameters::REFERENCE.trials
}

/// Sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Infection model: "gaussian" or "binomial"
    #[serde(default)]
    pub model: SamplingModel,
    /// Fixed seed; omit for a fresh entropy seed every run
    #[serde(default)]
    pub seed: Option<u64>,
    /// Toys drawn per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// "propagate" or "discard" NaN/infinite ratios
    #[serde(default)]
    pub non_finite: NonFinitePolicy,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            model: SamplingModel::default(),
            seed: None,
            batch_size: default_batch_size(),
            non_finite: NonFinitePolicy::default(),
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Bin the toys into histograms
    #[serde(default = "default_true")]
    pub histograms: bool,
    /// Include the analytic cross-check intervals
    #[serde(default = "default_true")]
    pub reference: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            histograms: true,
            reference: true,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_true() -> bool {
    true
}

/// Histogram layouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Bins for the infection toys
    #[serde(default = "default_infection_bins")]
    pub infection_bins: usize,
    /// Half-width of the infection range in standard deviations around the mean
    #[serde(default = "default_infection_sigmas")]
    pub infection_sigmas: f64,
    /// Fatality toys are binned per integer from 0 up to this count
    #[serde(default = "default_fatal_max")]
    pub fatal_max: u64,
    /// Bins for the IFR toys
    #[serde(default = "default_ifr_bins")]
    pub ifr_bins: usize,
    /// Upper edge of the IFR histogram, in percent
    #[serde(default = "default_ifr_max_pct")]
    pub ifr_max_pct: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            infection_bins: default_infection_bins(),
            infection_sigmas: default_infection_sigmas(),
            fatal_max: default_fatal_max(),
            ifr_bins: default_ifr_bins(),
            ifr_max_pct: default_ifr_max_pct(),
        }
    }
}

fn default_infection_bins() -> usize {
    30
}
fn default_infection_sigmas() -> f64 {
    4.0
}
fn default_fatal_max() -> u64 {
    30
}
fn default_ifr_bins() -> usize {
    100
}
fn default_ifr_max_pct() -> f64 {
    1.0
}

impl IfrConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for `ifr.toml`
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# IFR Monte-Carlo configuration

[study]
# Population the fatalities were counted in
population = 12597
# Individuals tested in the random sample
tested = 919
# Positive results among the tested
infected = 138
# Fatalities in the whole population
fatal = 7
# Monte-Carlo toys
trials = 1000000

[sampling]
# Infection model: "binomial" (Binomial(population, infected/tested))
# or "gaussian" (Normal scaled from the tested sample to the population)
model = "binomial"
# Fixed seed for reproducible runs (uncomment to enable)
# seed = 42
# Toys drawn per batch
batch_size = 65536
# NaN/infinite ratios from zero-infection toys: "propagate" or "discard"
non_finite = "propagate"

[output]
# Default output format: human, json, csv
format = "human"
# Bin toys into histograms
histograms = true
# Include Clopper-Pearson and Garwood intervals for comparison
reference = true

[histograms]
infection_bins = 30
infection_sigmas = 4.0
fatal_max = 30
ifr_bins = 100
ifr_max_pct = 1.0
"#
        .to_string()
    }
}
