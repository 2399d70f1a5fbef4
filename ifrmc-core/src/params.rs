//! Study Parameters
//!
//! The five counts that fully describe one estimation run.

use crate::error::IfrError;
use serde::{Deserialize, Serialize};

/// Counts from a serological study plus the number of Monte-Carlo toys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyParameters {
    /// Size of the population the fatalities were counted in
    pub population: u64,
    /// Individuals tested in the random sample
    pub tested: u64,
    /// Positive results among the tested
    pub infected: u64,
    /// Fatalities observed in the whole population
    pub fatal: u64,
    /// Number of toys to draw
    pub trials: u64,
}

impl StudyParameters {
    /// Published study: 138 of 919 tested were infected, 7 deaths among 12597 people
    pub const REFERENCE: StudyParameters = StudyParameters {
        population: 12_597,
        tested: 919,
        infected: 138,
        fatal: 7,
        trials: 1_000_000,
    };

    /// Build and validate parameters
    pub fn new(
        population: u64,
        tested: u64,
        infected: u64,
        fatal: u64,
        trials: u64,
    ) -> Result<Self, IfrError> {
        let params = Self {
            population,
            tested,
            infected,
            fatal,
            trials,
        };
        params.validate()?;
        Ok(params)
    }

    /// Same study with a different toy count
    pub fn with_trials(self, trials: u64) -> Self {
        Self { trials, ..self }
    }

    /// Check the count invariants
    pub fn validate(&self) -> Result<(), IfrError> {
        if self.tested == 0 {
            return Err(IfrError::invalid("tested count is zero, infection rate is undefined"));
        }
        if self.tested > self.population {
            return Err(IfrError::invalid(format!(
                "tested count {} exceeds population {}",
                self.tested, self.population
            )));
        }
        if self.infected > self.tested {
            return Err(IfrError::invalid(format!(
                "infected count {} exceeds tested count {}",
                self.infected, self.tested
            )));
        }
        if self.trials == 0 {
            return Err(IfrError::invalid("at least one trial is required"));
        }
        if usize::try_from(self.trials).is_err() {
            return Err(IfrError::invalid(format!(
                "{} trials do not fit in memory on this platform",
                self.trials
            )));
        }
        Ok(())
    }

    /// Sample infection rate `infected / tested`
    pub fn infection_rate(&self) -> f64 {
        self.infected as f64 / self.tested as f64
    }

    /// Factor projecting sample counts onto the population, `population / tested`
    pub fn scale_factor(&self) -> f64 {
        self.population as f64 / self.tested as f64
    }

    /// Expected number of infections in the population
    pub fn scaled_infections(&self) -> f64 {
        self.infected as f64 * self.scale_factor()
    }

    /// Naive IFR without any uncertainty: `fatal / scaled_infections`
    pub fn point_estimate(&self) -> f64 {
        self.fatal as f64 / self.scaled_infections()
    }

    /// Toy count as a length
    pub fn trial_count(&self) -> usize {
        // validate() guarantees the conversion succeeds
        usize::try_from(self.trials).unwrap_or(usize::MAX)
    }
}

impl Default for StudyParameters {
    fn default() -> Self {
        Self::REFERENCE
    }
}
