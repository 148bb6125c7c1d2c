//! Static dispatch enum over the trained model families.
//!
//! A commodity owns exactly one `PriceModel`; dispatch is a `match`, no
//! trait objects.
//!
//! ## Example
//!
//! ```
//! use mandi_core::types::{PriceHistory, PriceRecord, YearMonth};
//! use mandi_models::models::{PriceModel, SeasonalTrendModel};
//!
//! let start = YearMonth::new(2024, 1).unwrap();
//! let history = PriceHistory::new(vec![
//!     PriceRecord::new(start, 10.0),
//!     PriceRecord::new(start.succ(), 11.0),
//! ])
//! .unwrap();
//!
//! let model = PriceModel::SeasonalTrend(SeasonalTrendModel::fit(&history, 0, 0.0).unwrap());
//! assert_eq!(model.model_name(), "seasonal_trend");
//! assert!((model.predict(start.add_months(2)) - 12.0).abs() < 1e-9);
//! ```

use mandi_core::types::YearMonth;

use super::decision_tree::DecisionTreeModel;
use super::seasonal_trend::SeasonalTrendModel;

/// A trained commodity price model.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceModel {
    /// Trend + seasonal harmonics
    SeasonalTrend(SeasonalTrendModel),
    /// Regression tree
    DecisionTree(DecisionTreeModel),
}

impl PriceModel {
    /// Predicted price for `period` (never negative).
    #[inline]
    pub fn predict(&self, period: YearMonth) -> f64 {
        match self {
            PriceModel::SeasonalTrend(m) => m.predict(period),
            PriceModel::DecisionTree(m) => m.predict(period),
        }
    }

    /// Model family name.
    pub fn model_name(&self) -> &'static str {
        match self {
            PriceModel::SeasonalTrend(_) => "seasonal_trend",
            PriceModel::DecisionTree(_) => "decision_tree",
        }
    }
}

impl From<SeasonalTrendModel> for PriceModel {
    fn from(model: SeasonalTrendModel) -> Self {
        PriceModel::SeasonalTrend(model)
    }
}

impl From<DecisionTreeModel> for PriceModel {
    fn from(model: DecisionTreeModel) -> Self {
        PriceModel::DecisionTree(model)
    }
}
