//! Error types for structured error handling.
//!
//! This module provides:
//! - `YearMonthError`: Errors from calendar-month construction and parsing
//! - `HistoryError`: Errors from price history validation
//! - `SolverError`: Errors from the linear least-squares solver

use thiserror::Error;

use super::period::YearMonth;

/// Calendar-month errors.
///
/// # Examples
/// ```
/// use mandi_core::types::YearMonthError;
///
/// let err = YearMonthError::InvalidMonth { year: 2024, month: 13 };
/// assert_eq!(format!("{}", err), "Invalid month: 2024-13 (month must be 1-12)");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YearMonthError {
    /// Month component outside 1..=12.
    #[error("Invalid month: {year}-{month} (month must be 1-12)")]
    InvalidMonth {
        /// Year component
        year: i32,
        /// Month component as supplied
        month: u32,
    },

    /// Failed to parse a `YYYY-MM` string.
    #[error("Month parse error: {0}")]
    ParseError(String),
}

/// Price history validation errors.
///
/// A history is rejected rather than repaired: duplicate months are never
/// merged and invalid prices are never clamped.
///
/// # Examples
/// ```
/// use mandi_core::types::HistoryError;
///
/// assert_eq!(format!("{}", HistoryError::Empty), "Price history is empty");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// No records were supplied.
    #[error("Price history is empty")]
    Empty,

    /// The same month appears more than once.
    #[error("Duplicate price record for {period}")]
    DuplicatePeriod {
        /// The repeated month
        period: YearMonth,
    },

    /// Price is negative, NaN or infinite.
    #[error("Invalid price {price} for {period}: prices must be finite and non-negative")]
    InvalidPrice {
        /// Month of the offending record
        period: YearMonth,
        /// The rejected value
        price: f64,
    },
}

/// Linear solver errors.
///
/// # Examples
/// ```
/// use mandi_core::types::SolverError;
///
/// let err = SolverError::NotPositiveDefinite { pivot: 2 };
/// assert!(format!("{}", err).contains("pivot 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The system has no unknowns or no observations.
    #[error("Empty system: {0}")]
    EmptySystem(String),

    /// Row lengths or right-hand side length do not agree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Cholesky factorisation hit a non-positive pivot.
    #[error("Matrix is not positive definite (pivot {pivot})")]
    NotPositiveDefinite {
        /// Index of the failing pivot
        pivot: usize,
    },
}
