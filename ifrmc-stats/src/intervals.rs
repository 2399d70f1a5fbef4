//! Interval Extraction
//!
//! Turns an empirical ratio distribution into a mean and symmetric-tail
//! confidence intervals at 68.3% and 95%.
//!
//! The mean is the plain arithmetic mean over every toy. Under
//! [`NonFinitePolicy::Propagate`] a single infinite or NaN toy therefore
//! poisons the mean, which is exactly what an unguarded float pipeline does.
//! [`NonFinitePolicy::Discard`] drops those toys before anything is computed.

use crate::percentiles::{percentile_of_sorted, sort_samples, tail_percentiles};
use crate::{CL68, CL95};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with NaN and infinite toys before extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonFinitePolicy {
    /// Keep them; they sort per IEEE total order and enter the mean
    #[default]
    Propagate,
    /// Remove them and report how many were removed
    Discard,
}

impl std::str::FromStr for NonFinitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" | "keep" => Ok(NonFinitePolicy::Propagate),
            "discard" | "drop" => Ok(NonFinitePolicy::Discard),
            other => Err(format!("Unknown non-finite policy: {}", other)),
        }
    }
}

impl std::fmt::Display for NonFinitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonFinitePolicy::Propagate => write!(f, "propagate"),
            NonFinitePolicy::Discard => write!(f, "discard"),
        }
    }
}

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level in (0, 1)
    pub level: f64,
}

impl ConfidenceInterval {
    /// Multiply both bounds by `factor` (e.g. 100 for percent)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            lower: self.lower * factor,
            upper: self.upper * factor,
            level: self.level,
        }
    }

    /// Whether `value` lies within the closed interval
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Distance between the bounds
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Mean and central intervals of an empirical distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalSummary {
    /// Arithmetic mean over the retained toys
    pub mean: f64,
    /// 68.3% central interval
    pub ci68: ConfidenceInterval,
    /// 95% central interval
    pub ci95: ConfidenceInterval,
    /// Toys the summary was computed from
    pub sample_count: usize,
    /// Non-finite toys seen in the input (kept or dropped depending on policy)
    pub non_finite_count: usize,
}

impl IntervalSummary {
    /// Same summary expressed in percent
    pub fn to_percent(&self) -> Self {
        Self {
            mean: self.mean * 100.0,
            ci68: self.ci68.scaled(100.0),
            ci95: self.ci95.scaled(100.0),
            ..*self
        }
    }

    /// Check `ci95.lower <= ci68.lower <= mean <= ci68.upper <= ci95.upper`
    pub fn is_nested(&self) -> bool {
        self.ci95.lower <= self.ci68.lower
            && self.ci68.lower <= self.mean
            && self.mean <= self.ci68.upper
            && self.ci68.upper <= self.ci95.upper
    }
}

/// Errors that can occur during interval extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    /// Nothing to extract from, possibly after discarding non-finite toys
    #[error("No samples left to extract intervals from")]
    Empty,

    /// Level outside the open interval (0, 1)
    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),
}

/// Central interval at `level` from samples already sorted ascending
pub fn interval_of_sorted(
    sorted: &[f64],
    level: f64,
) -> Result<ConfidenceInterval, IntervalError> {
    if sorted.is_empty() {
        return Err(IntervalError::Empty);
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(IntervalError::InvalidConfidenceLevel(level));
    }

    let (low, high) = tail_percentiles(level);
    Ok(ConfidenceInterval {
        lower: percentile_of_sorted(sorted, low),
        upper: percentile_of_sorted(sorted, high),
        level,
    })
}

/// Extract mean, CI68 and CI95 from a ratio sequence
///
/// Takes ownership so the sequence can be sorted in place without a copy.
pub fn extract_intervals(
    mut samples: Vec<f64>,
    policy: NonFinitePolicy,
) -> Result<IntervalSummary, IntervalError> {
    extract_intervals_in_place(&mut samples, policy)
}

/// Extract mean, CI68 and CI95, leaving `samples` sorted ascending
///
/// The mean is summed in input order before sorting, so the result is
/// bit-identical to [`extract_intervals`]. Non-finite toys stay in the slice
/// under either policy; [`NonFinitePolicy::Discard`] only excludes them from
/// the statistics.
pub fn extract_intervals_in_place(
    samples: &mut [f64],
    policy: NonFinitePolicy,
) -> Result<IntervalSummary, IntervalError> {
    let non_finite_count = samples.iter().filter(|x| !x.is_finite()).count();

    let mean = match policy {
        NonFinitePolicy::Propagate if !samples.is_empty() => {
            samples.iter().sum::<f64>() / samples.len() as f64
        }
        NonFinitePolicy::Discard if samples.len() > non_finite_count => {
            let finite = samples.len() - non_finite_count;
            samples.iter().filter(|x| x.is_finite()).sum::<f64>() / finite as f64
        }
        _ => return Err(IntervalError::Empty),
    };

    sort_samples(samples);

    let sorted: &[f64] = samples;
    let retained = match policy {
        NonFinitePolicy::Propagate => sorted,
        NonFinitePolicy::Discard => finite_block(sorted),
    };

    Ok(IntervalSummary {
        mean,
        ci68: interval_of_sorted(retained, CL68)?,
        ci95: interval_of_sorted(retained, CL95)?,
        sample_count: retained.len(),
        non_finite_count,
    })
}

/// Under the total order every finite value sits between the negative
/// non-finites (`-NaN`, `-inf`) and the positive ones (`+inf`, `+NaN`).
fn finite_block(sorted: &[f64]) -> &[f64] {
    let start = sorted.partition_point(|x| x.is_sign_negative() && !x.is_finite());
    let len = sorted[start..].partition_point(|x| x.is_finite());
    &sorted[start..start + len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_ramp() {
        let samples: Vec<f64> = (0..100).map(|x| x as f64).collect();
        let summary = extract_intervals(samples, NonFinitePolicy::Propagate).unwrap();

        assert!((summary.mean - 49.5).abs() < 1e-12);
        assert!((summary.ci95.lower - 2.475).abs() < 1e-9);
        assert!((summary.ci95.upper - 96.525).abs() < 1e-9);
        assert!((summary.ci68.lower - 15.6915).abs() < 1e-6);
        assert!((summary.ci68.upper - 83.3085).abs() < 1e-6);
        assert!(summary.is_nested());
        assert_eq!(summary.sample_count, 100);
    }

    #[test]
    fn test_order_does_not_matter() {
        let ascending: Vec<f64> = (0..50).map(|x| x as f64).collect();
        let mut shuffled = ascending.clone();
        shuffled.reverse();
        shuffled.swap(3, 41);

        let a = extract_intervals(ascending, NonFinitePolicy::Propagate).unwrap();
        let b = extract_intervals(shuffled, NonFinitePolicy::Propagate).unwrap();
        assert_eq!(a.ci68, b.ci68);
        assert_eq!(a.ci95, b.ci95);
    }

    #[test]
    fn test_propagate_keeps_infinity_in_mean() {
        let mut samples: Vec<f64> = (0..99).map(|x| x as f64).collect();
        samples.push(f64::INFINITY);
        let summary = extract_intervals(samples, NonFinitePolicy::Propagate).unwrap();

        assert_eq!(summary.mean, f64::INFINITY);
        assert_eq!(summary.non_finite_count, 1);
        assert_eq!(summary.sample_count, 100);
        // The lower tail is untouched by a single +inf
        assert!(summary.ci95.lower.is_finite());
    }

    #[test]
    fn test_discard_drops_non_finite() {
        let mut samples: Vec<f64> = (0..100).map(|x| x as f64).collect();
        samples.push(f64::NAN);
        samples.push(f64::INFINITY);
        let summary = extract_intervals(samples, NonFinitePolicy::Discard).unwrap();

        assert!((summary.mean - 49.5).abs() < 1e-12);
        assert_eq!(summary.sample_count, 100);
        assert_eq!(summary.non_finite_count, 2);
    }

    #[test]
    fn test_discard_everything_is_empty() {
        let result = extract_intervals(vec![f64::NAN, f64::NAN], NonFinitePolicy::Discard);
        assert_eq!(result, Err(IntervalError::Empty));
    }

    #[test]
    fn test_empty_input() {
        let result = extract_intervals(Vec::new(), NonFinitePolicy::Propagate);
        assert_eq!(result, Err(IntervalError::Empty));
    }

    #[test]
    fn test_invalid_level() {
        let sorted = vec![1.0, 2.0];
        assert!(matches!(
            interval_of_sorted(&sorted, 1.0),
            Err(IntervalError::InvalidConfidenceLevel(_))
        ));
        assert!(matches!(
            interval_of_sorted(&sorted, f64::NAN),
            Err(IntervalError::InvalidConfidenceLevel(_))
        ));
    }

    #[test]
    fn test_single_sample() {
        let summary = extract_intervals(vec![0.004], NonFinitePolicy::Propagate).unwrap();
        assert_eq!(summary.mean, 0.004);
        assert_eq!(summary.ci95.lower, 0.004);
        assert_eq!(summary.ci95.upper, 0.004);
    }

    #[test]
    fn test_to_percent() {
        let samples: Vec<f64> = (0..100).map(|x| x as f64 / 1000.0).collect();
        let summary = extract_intervals(samples, NonFinitePolicy::Propagate).unwrap();
        let percent = summary.to_percent();
        assert!((percent.mean - summary.mean * 100.0).abs() < 1e-12);
        assert_eq!(percent.ci95.level, CL95);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "discard".parse::<NonFinitePolicy>().unwrap(),
            NonFinitePolicy::Discard
        );
        assert_eq!(
            "Propagate".parse::<NonFinitePolicy>().unwrap(),
            NonFinitePolicy::Propagate
        );
        assert!("mask".parse::<NonFinitePolicy>().is_err());
    }

    #[test]
    fn test_in_place_matches_owned() {
        let samples: Vec<f64> = (0..500)
            .map(|i| match i % 97 {
                0 => f64::INFINITY,
                1 => -f64::NAN,
                2 => f64::NAN,
                _ => ((i * 31) % 211) as f64 / 1000.0,
            })
            .collect();

        for policy in [NonFinitePolicy::Propagate, NonFinitePolicy::Discard] {
            let owned = extract_intervals(samples.clone(), policy).unwrap();
            let mut buffer = samples.clone();
            let in_place = extract_intervals_in_place(&mut buffer, policy).unwrap();

            assert_eq!(owned.ci68, in_place.ci68);
            assert_eq!(owned.ci95, in_place.ci95);
            assert_eq!(owned.mean.to_bits(), in_place.mean.to_bits());
            assert_eq!(owned.sample_count, in_place.sample_count);
            // Every toy is still there, sorted
            assert_eq!(buffer.len(), samples.len());
            assert!(buffer.windows(2).all(|w| w[0].total_cmp(&w[1]).is_le()));
        }
    }

    #[test]
    fn test_discard_ignores_negative_nan() {
        let mut samples = vec![-f64::NAN, f64::NEG_INFINITY, 3.0, 1.0, 2.0, f64::INFINITY];
        let summary = extract_intervals_in_place(&mut samples, NonFinitePolicy::Discard).unwrap();
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.non_finite_count, 3);
        assert!((summary.ci95.lower - 1.05).abs() < 1e-9);
        assert!((summary.mean - 2.0).abs() < 1e-12);
    }
}
