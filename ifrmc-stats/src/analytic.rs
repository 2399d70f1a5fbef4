//! Analytic Intervals
//!
//! Closed-form intervals used to cross-check the Monte-Carlo result:
//! - Clopper-Pearson ("exact") interval for a binomial proportion
//! - Garwood interval for a Poisson mean
//!
//! Both are central intervals: each tail holds `(1 - level) / 2`.

use crate::intervals::ConfidenceInterval;
use statrs::distribution::{Beta, ContinuousCDF, Gamma};
use thiserror::Error;

/// Errors from analytic interval construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticError {
    /// Counts that describe no proportion or Poisson mean
    #[error("Invalid counts: {successes} successes out of {trials} trials")]
    InvalidCounts {
        /// Trials (or the observed count for Poisson)
        trials: f64,
        /// Successes (or the observed count for Poisson)
        successes: f64,
    },

    /// Level outside the open interval (0, 1)
    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    /// statrs refused the distribution parameters
    #[error("Distribution error: {0}")]
    Distribution(String),
}

fn check_level(level: f64) -> Result<f64, AnalyticError> {
    if level > 0.0 && level < 1.0 {
        Ok((1.0 - level) / 2.0)
    } else {
        Err(AnalyticError::InvalidConfidenceLevel(level))
    }
}

fn beta_quantile(p: f64, a: f64, b: f64) -> Result<f64, AnalyticError> {
    let beta = Beta::new(a, b).map_err(|e| AnalyticError::Distribution(e.to_string()))?;
    Ok(beta.inverse_cdf(p))
}

fn gamma_quantile(p: f64, shape: f64) -> Result<f64, AnalyticError> {
    let gamma = Gamma::new(shape, 1.0).map_err(|e| AnalyticError::Distribution(e.to_string()))?;
    Ok(gamma.inverse_cdf(p))
}

/// Clopper-Pearson interval for the proportion `successes / trials`
///
/// `trials` may be fractional, which is what a population-scaled infection
/// count looks like.
pub fn clopper_pearson(
    trials: f64,
    successes: f64,
    level: f64,
) -> Result<ConfidenceInterval, AnalyticError> {
    if !(trials > 0.0 && trials.is_finite() && successes >= 0.0 && successes <= trials) {
        return Err(AnalyticError::InvalidCounts { trials, successes });
    }
    let tail = check_level(level)?;

    let lower = if successes == 0.0 {
        0.0
    } else {
        beta_quantile(tail, successes, trials - successes + 1.0)?
    };
    let upper = if successes == trials {
        1.0
    } else {
        beta_quantile(1.0 - tail, successes + 1.0, trials - successes)?
    };

    Ok(ConfidenceInterval {
        lower,
        upper,
        level,
    })
}

/// Garwood interval for the mean of a Poisson count `observed`
pub fn poisson_interval(observed: f64, level: f64) -> Result<ConfidenceInterval, AnalyticError> {
    if !(observed >= 0.0 && observed.is_finite()) {
        return Err(AnalyticError::InvalidCounts {
            trials: observed,
            successes: observed,
        });
    }
    let tail = check_level(level)?;

    let lower = if observed == 0.0 {
        0.0
    } else {
        gamma_quantile(tail, observed)?
    };
    let upper = gamma_quantile(1.0 - tail, observed + 1.0)?;

    Ok(ConfidenceInterval {
        lower,
        upper,
        level,
    })
}
