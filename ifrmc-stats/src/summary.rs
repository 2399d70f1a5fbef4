//! Summary Statistics
//!
//! Shape diagnostics for a sequence of toys: count, mean, population standard
//! deviation (ddof = 0), extremes and the number of non-finite values.
//!
//! [`RunningSummary`] accumulates with Welford's update so a streamed run and a
//! fully materialised run over the same values give bit-identical summaries.

/// Summary of one toy sequence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleSummary {
    /// Number of samples seen
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest finite sample (0.0 if none)
    pub min: f64,
    /// Largest finite sample (0.0 if none)
    pub max: f64,
    /// Samples that were NaN or infinite
    pub non_finite: usize,
}

/// Streaming accumulator behind [`SampleSummary`]
#[derive(Debug, Clone, Default)]
pub struct RunningSummary {
    count: usize,
    mean: f64,
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
    non_finite: usize,
}

impl RunningSummary {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);

        if value.is_finite() {
            self.min = Some(self.min.map_or(value, |m| m.min(value)));
            self.max = Some(self.max.map_or(value, |m| m.max(value)));
        } else {
            self.non_finite += 1;
        }
    }

    /// Add every sample of a slice
    pub fn extend(&mut self, values: &[f64]) {
        for &value in values {
            self.push(value);
        }
    }

    /// Snapshot the accumulated statistics
    pub fn finish(&self) -> SampleSummary {
        if self.count == 0 {
            return SampleSummary::default();
        }

        SampleSummary {
            count: self.count,
            mean: self.mean,
            std_dev: (self.m2 / self.count as f64).sqrt(),
            min: self.min.unwrap_or(0.0),
            max: self.max.unwrap_or(0.0),
            non_finite: self.non_finite,
        }
    }
}

/// Compute summary statistics for a full sequence
pub fn compute_summary(samples: &[f64]) -> SampleSummary {
    let mut running = RunningSummary::new();
    running.extend(samples);
    running.finish()
}
