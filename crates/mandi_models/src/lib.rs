//! # mandi_models: Commodity Price Models
//!
//! Turns a validated [`PriceHistory`](mandi_core::types::PriceHistory) into a
//! trained function `predict(period) -> price` that can be evaluated both
//! inside and beyond the observed months.
//!
//! ## Models
//!
//! - [`SeasonalTrendModel`](models::SeasonalTrendModel): linear trend plus
//!   calendar-month harmonics, fitted by ridge-stabilised least squares.
//!   Deterministic. The default.
//! - [`DecisionTreeModel`](models::DecisionTreeModel): CART regression tree on
//!   `[months since start, calendar month]`. A seed fixes split tie-breaking.
//!
//! Both are wrapped in the static-dispatch [`PriceModel`](models::PriceModel)
//! enum and built through [`train`](training::train).
//!
//! ## Accuracy caveat
//!
//! Predictions after the last observed month are extrapolations and are not
//! validated against any ground truth.
//!
//! ## Example
//!
//! ```
//! use mandi_core::types::{PriceHistory, PriceRecord, YearMonth};
//! use mandi_models::models::ModelKind;
//! use mandi_models::training::train;
//!
//! let start = YearMonth::new(2024, 1).unwrap();
//! let records = (0..6)
//!     .map(|i| PriceRecord::new(start.add_months(i), 50.0 + 10.0 * i as f64))
//!     .collect();
//! let history = PriceHistory::new(records).unwrap();
//!
//! let model = train(&history, &ModelKind::default(), Some(42)).unwrap();
//! let next = model.predict(start.add_months(6));
//! assert!((next - 110.0).abs() < 1e-2);
//! ```

pub mod error;
pub mod models;
pub mod training;

pub use error::TrainingError;
pub use models::{ModelKind, PriceModel};
pub use training::{train, MIN_OBSERVATIONS};
