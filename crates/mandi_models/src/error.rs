//! Training error types.

use mandi_core::types::SolverError;
use thiserror::Error;

/// Errors that can occur while training a commodity model.
///
/// # Examples
///
/// ```
/// use mandi_models::TrainingError;
///
/// let err = TrainingError::InsufficientHistory { got: 1, need: 2 };
/// assert!(format!("{}", err).contains("need at least 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    /// Too few observations to fit anything but an unfounded constant.
    #[error("Insufficient price history: got {got} observation(s), need at least {need}")]
    InsufficientHistory {
        /// Observations supplied
        got: usize,
        /// Minimum required
        need: usize,
    },

    /// Model configuration is out of range.
    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),

    /// Fitted coefficients are not finite.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Wrapped least-squares failure.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}
