//! A trained commodity.

use mandi_core::types::{PriceHistory, YearMonth};
use mandi_models::PriceModel;
use std::path::{Path, PathBuf};

use crate::config::CommoditySource;

/// One tradeable good with its history and trained model.
///
/// A `Commodity` only exists once its model has been trained, and never
/// changes afterwards.
#[derive(Debug, Clone)]
pub struct Commodity {
    name: String,
    source_path: PathBuf,
    source_id: String,
    history: PriceHistory,
    model: PriceModel,
    anchor: YearMonth,
}

impl Commodity {
    /// Assemble a trained commodity. The anchor is `as_of` when given, else
    /// the latest observed month.
    pub fn new(
        source: &CommoditySource,
        history: PriceHistory,
        model: PriceModel,
        as_of: Option<YearMonth>,
    ) -> Self {
        let anchor = as_of.unwrap_or(history.latest().period);
        Self {
            name: source.name.clone(),
            source_path: source.path.clone(),
            source_id: source.source_id(),
            history,
            model,
            anchor,
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the price table was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Identifier derived from the source path (file stem).
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Observed price history.
    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Trained model.
    pub fn model(&self) -> &PriceModel {
        &self.model
    }

    /// The month treated as "now".
    pub fn anchor(&self) -> YearMonth {
        self.anchor
    }

    /// Latest month with an observed price.
    pub fn latest_observed(&self) -> YearMonth {
        self.history.latest().period
    }

    /// Model prediction for `period`.
    #[inline]
    pub fn predict(&self, period: YearMonth) -> f64 {
        self.model.predict(period)
    }

    /// Model prediction `months` after the anchor (negative looks back).
    #[inline]
    pub fn predict_offset(&self, months: i64) -> f64 {
        self.predict(self.anchor.add_months(months))
    }
}
