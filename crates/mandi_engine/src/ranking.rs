//! Cross-commodity ranking of predicted price movement.
//!
//! The change of a commodity over `k` months is
//! `(predict(anchor + k) - predict(anchor)) / predict(anchor)`.
//! Commodities whose anchor prediction is not strictly positive have no
//! defined change and are left out with a warning.
//!
//! Ties keep configuration order: sorting is stable over the registry's
//! commodity order.

use mandi_core::types::YearMonth;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::commodity::Commodity;

/// Length of the winners and losers lists.
pub const TOP_N: usize = 5;

/// Predicted movement of one commodity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// Canonical commodity name
    pub commodity: String,
    /// Month of `future_price`
    pub period: YearMonth,
    /// Prediction at the anchor
    pub current_price: f64,
    /// Prediction at `period`
    pub future_price: f64,
    /// Fractional change, `(future - current) / current`
    pub change: f64,
}

impl RankingEntry {
    /// Change in percent.
    pub fn percent(&self) -> f64 {
        self.change * 100.0
    }
}

/// Largest and smallest movers for one step ahead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMovers {
    /// Months after the anchor
    pub step: u32,
    /// Largest change at this step
    pub top_gainer: RankingEntry,
    /// Smallest change at this step
    pub top_loser: RankingEntry,
}

/// Change of every rankable commodity `months_ahead` months after its anchor,
/// in configuration order.
pub fn predicted_changes(commodities: &[Arc<Commodity>], months_ahead: u32) -> Vec<RankingEntry> {
    commodities
        .iter()
        .filter_map(|commodity| {
            let current = commodity.predict_offset(0);
            if current <= 0.0 || !current.is_finite() {
                warn!(
                    commodity = commodity.name(),
                    current_price = current,
                    "Excluding commodity from ranking: non-positive current prediction"
                );
                return None;
            }

            let period = commodity.anchor().add_months(i64::from(months_ahead));
            let future = commodity.predict(period);
            Some(RankingEntry {
                commodity: commodity.name().to_string(),
                period,
                current_price: current,
                future_price: future,
                change: (future - current) / current,
            })
        })
        .collect()
}

/// Up to [`TOP_N`] commodities with the largest next-month change, descending.
pub fn top_winners(commodities: &[Arc<Commodity>]) -> Vec<RankingEntry> {
    let mut entries = predicted_changes(commodities, 1);
    entries.sort_by(|a, b| b.change.total_cmp(&a.change));
    entries.truncate(TOP_N);
    entries
}

/// Up to [`TOP_N`] commodities with the smallest next-month change, ascending.
pub fn top_losers(commodities: &[Arc<Commodity>]) -> Vec<RankingEntry> {
    let mut entries = predicted_changes(commodities, 1);
    entries.sort_by(|a, b| a.change.total_cmp(&b.change));
    entries.truncate(TOP_N);
    entries
}

/// For each step `1..=months`, the commodity with the largest and the
/// smallest change relative to its anchor.
///
/// A step is omitted when no commodity is rankable.
pub fn movers_summary(commodities: &[Arc<Commodity>], months: u32) -> Vec<MonthlyMovers> {
    (1..=months)
        .filter_map(|step| {
            let entries = predicted_changes(commodities, step);
            let mut iter = entries.iter();
            let first = iter.next()?;

            let (gainer, loser) = iter.fold((first, first), |(hi, lo), e| {
                let hi = if e.change > hi.change { e } else { hi };
                let lo = if e.change < lo.change { e } else { lo };
                (hi, lo)
            });

            Some(MonthlyMovers {
                step,
                top_gainer: gainer.clone(),
                top_loser: loser.clone(),
            })
        })
        .collect()
}
