//! Analytic Reference
//!
//! Closed-form IFR intervals to hold the Monte-Carlo result against. Both treat
//! the scaled infection count `infected * population / tested` as exact.

use crate::error::IfrError;
use crate::params::StudyParameters;
use ifrmc_stats::{CL68, CL95, ConfidenceInterval, clopper_pearson, poisson_interval};

/// Analytic IFR intervals for one study, as fractions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticReference {
    /// `fatal / scaled_infections`
    pub point_estimate: f64,
    /// Clopper-Pearson with `fatal` successes out of `scaled_infections` trials
    pub clopper_pearson_68: ConfidenceInterval,
    /// Clopper-Pearson at 95 %
    pub clopper_pearson_95: ConfidenceInterval,
    /// Garwood interval on the fatality count, divided by `scaled_infections`
    pub poisson_68: ConfidenceInterval,
    /// Garwood at 95 %
    pub poisson_95: ConfidenceInterval,
}

impl AnalyticReference {
    /// Compute every analytic interval for `params`
    pub fn compute(params: &StudyParameters) -> Result<Self, IfrError> {
        params.validate()?;

        let trials = params.scaled_infections();
        let successes = params.fatal as f64;

        let poisson = |level: f64| -> Result<ConfidenceInterval, IfrError> {
            Ok(poisson_interval(successes, level)?.scaled(1.0 / trials))
        };

        Ok(Self {
            point_estimate: params.point_estimate(),
            clopper_pearson_68: clopper_pearson(trials, successes, CL68)?,
            clopper_pearson_95: clopper_pearson(trials, successes, CL95)?,
            poisson_68: poisson(CL68)?,
            poisson_95: poisson(CL95)?,
        })
    }
}
