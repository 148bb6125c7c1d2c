//! # mandi_core: Foundation Types for Commodity Price Forecasting
//!
//! ## Layer 1 (Foundation) Role
//!
//! mandi_core is the bottom layer of the workspace, providing:
//! - Calendar-month arithmetic: `YearMonth` (`types::period`)
//! - Validated price series: `PriceRecord`, `PriceHistory` (`types::history`)
//! - Error types: `YearMonthError`, `HistoryError`, `SolverError` (`types::error`)
//! - Regularised least-squares solving (`math::solvers`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other mandi_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Wall-clock month lookup
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use mandi_core::types::{PriceHistory, PriceRecord, YearMonth};
//!
//! let jan = YearMonth::new(2024, 1).unwrap();
//! let history = PriceHistory::new(vec![
//!     PriceRecord::new(jan, 100.0),
//!     PriceRecord::new(jan.succ(), 104.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(history.latest().period, YearMonth::new(2024, 2).unwrap());
//! assert_eq!(jan.add_months(11).label(), "Dec 2024");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `YearMonth`, `PriceRecord` and error types

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod math;
pub mod types;
