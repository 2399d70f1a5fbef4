//! Report Data Structures
//!
//! JSON has no encoding for NaN or infinity, so serde_json writes them as
//! `null`. Fields that can legitimately hold such values read `null` back as
//! NaN instead of failing the whole parse.

use chrono::{DateTime, Utc};
use ifrmc_stats::{ConfidenceInterval, Histogram, IntervalSummary, SampleSummary};
use serde::{Deserialize, Deserializer, Serialize};

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// Study counts
    pub study: StudyInfo,
    /// IFR mean and intervals
    pub ifr: IfrMetrics,
    /// Shape of the infection, fatality and IFR toys
    pub diagnostics: Vec<SequenceMetrics>,
    /// Analytic cross-check intervals (empty when skipped)
    pub reference: Vec<ReferenceInterval>,
    /// Binned toys (empty when skipped)
    pub histograms: Vec<HistogramData>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// Crate version that wrote the report
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Infection model name
    pub model: String,
    /// Seed, if the run was reproducible
    pub seed: Option<u64>,
    /// Non-finite policy name
    pub non_finite_policy: String,
    /// Wall time of the estimation
    pub duration_ms: f64,
}

/// Study counts and the quantities derived from them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyInfo {
    /// Population the fatalities were counted in
    pub population: u64,
    /// Individuals tested
    pub tested: u64,
    /// Positives among the tested
    pub infected: u64,
    /// Fatalities in the population
    pub fatal: u64,
    /// Monte-Carlo toys drawn
    pub trials: u64,
    /// `infected / tested`
    pub infection_rate: f64,
    /// `infected * population / tested`
    pub scaled_infections: f64,
}

/// IFR mean and intervals, in percent
///
/// Under the propagate policy any of the bounds can be NaN or infinite; those
/// read back from JSON as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IfrMetrics {
    /// Mean IFR
    #[serde(deserialize_with = "nullable_f64")]
    pub mean_pct: f64,
    /// Lower bound of the 68.3% interval
    #[serde(deserialize_with = "nullable_f64")]
    pub ci68_lower_pct: f64,
    /// Upper bound of the 68.3% interval
    #[serde(deserialize_with = "nullable_f64")]
    pub ci68_upper_pct: f64,
    /// Lower bound of the 95% interval
    #[serde(deserialize_with = "nullable_f64")]
    pub ci95_lower_pct: f64,
    /// Upper bound of the 95% interval
    #[serde(deserialize_with = "nullable_f64")]
    pub ci95_upper_pct: f64,
    /// Toys the intervals were extracted from
    pub samples: usize,
    /// NaN or infinite toys seen
    pub non_finite: usize,
}

impl From<&IntervalSummary> for IfrMetrics {
    fn from(summary: &IntervalSummary) -> Self {
        let pct = summary.to_percent();
        Self {
            mean_pct: pct.mean,
            ci68_lower_pct: pct.ci68.lower,
            ci68_upper_pct: pct.ci68.upper,
            ci95_lower_pct: pct.ci95.lower,
            ci95_upper_pct: pct.ci95.upper,
            samples: pct.sample_count,
            non_finite: pct.non_finite_count,
        }
    }
}

impl IfrMetrics {
    /// One-line summary: `<IFR> = X.XXX % | CL68: [X.XXX X.XXX] % CL95: [X.XXX X.XXX] %`
    pub fn summary_line(&self) -> String {
        format!(
            "<IFR> = {:5.3} % | CL68: [{:5.3} {:5.3}] % CL95: [{:5.3} {:5.3}] %",
            self.mean_pct,
            self.ci68_lower_pct,
            self.ci68_upper_pct,
            self.ci95_lower_pct,
            self.ci95_upper_pct,
        )
    }
}

/// Shape diagnostics of one toy sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceMetrics {
    /// Sequence name: infections, fatalities or ifr
    pub name: String,
    /// Toys in the sequence
    pub count: usize,
    /// Mean, NaN or infinite if any toy was
    #[serde(deserialize_with = "nullable_f64")]
    pub mean: f64,
    /// Population standard deviation
    #[serde(deserialize_with = "nullable_f64")]
    pub std_dev: f64,
    /// Smallest finite toy
    pub min: f64,
    /// Largest finite toy
    pub max: f64,
    /// NaN or infinite toys
    pub non_finite: usize,
}

impl SequenceMetrics {
    /// Label a summary
    pub fn new(name: impl Into<String>, summary: &SampleSummary) -> Self {
        Self {
            name: name.into(),
            count: summary.count,
            mean: summary.mean,
            std_dev: summary.std_dev,
            min: summary.min,
            max: summary.max,
            non_finite: summary.non_finite,
        }
    }
}

/// One analytic interval, in percent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceInterval {
    /// "clopper-pearson" or "poisson"
    pub method: String,
    /// Confidence level
    pub level: f64,
    /// `fatal / scaled_infections`
    pub point_pct: f64,
    /// Lower bound
    pub lower_pct: f64,
    /// Upper bound
    pub upper_pct: f64,
}

impl ReferenceInterval {
    /// Convert a fractional interval to a percent entry
    pub fn new(method: impl Into<String>, point: f64, interval: &ConfidenceInterval) -> Self {
        let pct = interval.scaled(100.0);
        Self {
            method: method.into(),
            level: pct.level,
            point_pct: point * 100.0,
            lower_pct: pct.lower,
            upper_pct: pct.upper,
        }
    }
}

/// Binned toys ready for plotting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramData {
    /// Histogram name
    pub name: String,
    /// Axis label
    pub x_label: String,
    /// Bin edges, one more than the bins
    pub edges: Vec<f64>,
    /// Toys per bin
    pub counts: Vec<u64>,
    /// Probability density per bin
    pub density: Vec<f64>,
    /// Toys below the first edge
    pub underflow: u64,
    /// Toys above the last edge
    pub overflow: u64,
    /// NaN or infinite toys
    pub non_finite: u64,
}

impl HistogramData {
    /// Capture a filled histogram
    pub fn new(name: impl Into<String>, x_label: impl Into<String>, histogram: &Histogram) -> Self {
        Self {
            name: name.into(),
            x_label: x_label.into(),
            edges: histogram.edges().to_vec(),
            counts: histogram.counts().to_vec(),
            density: histogram.density(),
            underflow: histogram.underflow(),
            overflow: histogram.overflow(),
            non_finite: histogram.non_finite(),
        }
    }

    /// Total toys inside the edges
    pub fn in_range(&self) -> u64 {
        self.counts.iter().sum()
    }
}
