//! Error types

use ifrmc_stats::{AnalyticError, IntervalError};
use thiserror::Error;

/// Errors produced by the estimation pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IfrError {
    /// The study parameters cannot describe a valid study; raised before sampling
    #[error("Invalid study parameters: {0}")]
    InvalidParameters(String),

    /// Interval extraction failed (only possible when non-finite toys are discarded)
    #[error(transparent)]
    Interval(#[from] IntervalError),

    /// An analytic cross-check could not be built
    #[error(transparent)]
    Analytic(#[from] AnalyticError),
}

impl IfrError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        IfrError::InvalidParameters(reason.into())
    }
}
