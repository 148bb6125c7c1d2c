//! Core value types shared by every layer.
//!
//! - [`YearMonth`]: a calendar month, the time index of every price series
//! - [`PriceRecord`] / [`PriceHistory`]: one commodity's chronological prices
//! - Error types for construction and numerical failures

pub mod error;
pub mod history;
pub mod period;

pub use error::{HistoryError, SolverError, YearMonthError};
pub use history::{PriceHistory, PriceRecord};
pub use period::YearMonth;
