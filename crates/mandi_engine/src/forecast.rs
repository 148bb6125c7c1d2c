//! Forward and backward price sequences for one commodity.
//!
//! All sequences are computed on demand from the commodity's model and are
//! strictly ascending by month.
//!
//! # Extrapolation
//!
//! Months after the latest observation are model extrapolation and have not
//! been validated against data. Every [`ForecastPoint`] carries an
//! `extrapolated` flag so callers can present them accordingly.

use mandi_core::types::YearMonth;
use serde::Serialize;

use crate::commodity::Commodity;
use crate::error::QueryError;

/// Longest supported forecast horizon in months.
pub const MAX_HORIZON: u32 = 36;

/// Number of months in the backward-looking view.
pub const HISTORY_WINDOW: u32 = 12;

/// One predicted month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Month of the prediction
    pub period: YearMonth,
    /// Display label, e.g. `"Nov 2024"`
    pub label: String,
    /// Predicted price
    pub price: f64,
    /// True when `period` lies after the latest observation
    pub extrapolated: bool,
}

impl ForecastPoint {
    fn predicted(commodity: &Commodity, period: YearMonth) -> Self {
        Self {
            period,
            label: period.label(),
            price: commodity.predict(period),
            extrapolated: period > commodity.latest_observed(),
        }
    }
}

/// Forecast trajectory for one commodity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Canonical commodity name
    pub commodity: String,
    /// Month the horizon is counted from
    pub anchor: YearMonth,
    /// Points in ascending month order
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Number of forecast months.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Highest predicted month; the earliest wins a tie.
    pub fn peak(&self) -> Option<&ForecastPoint> {
        self.points
            .iter()
            .fold(None, |best: Option<&ForecastPoint>, p| match best {
                Some(b) if b.price >= p.price => Some(b),
                _ => Some(p),
            })
    }

    /// Lowest predicted month; the earliest wins a tie.
    pub fn trough(&self) -> Option<&ForecastPoint> {
        self.points
            .iter()
            .fold(None, |best: Option<&ForecastPoint>, p| match best {
                Some(b) if b.price <= p.price => Some(b),
                _ => Some(p),
            })
    }
}

/// Where a backward-looking price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    /// Recorded in the price table
    Observed,
    /// Model backfill for a month without a record
    Predicted,
}

/// One month of the previous-twelve view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    /// Month
    pub period: YearMonth,
    /// Display label
    pub label: String,
    /// Observed or backfilled price
    pub price: f64,
    /// Origin of `price`
    pub source: PointSource,
}

/// Check a horizon against `1..=MAX_HORIZON`.
pub fn validate_horizon(horizon: u32) -> Result<(), QueryError> {
    if horizon == 0 || horizon > MAX_HORIZON {
        return Err(QueryError::InvalidHorizon {
            requested: horizon,
            max: MAX_HORIZON,
        });
    }
    Ok(())
}

/// Predictions for the `horizon` months after the anchor.
pub fn forecast(commodity: &Commodity, horizon: u32) -> Result<ForecastResult, QueryError> {
    validate_horizon(horizon)?;

    let anchor = commodity.anchor();
    let points = (1..=i64::from(horizon))
        .map(|k| ForecastPoint::predicted(commodity, anchor.add_months(k)))
        .collect();

    Ok(ForecastResult {
        commodity: commodity.name().to_string(),
        anchor,
        points,
    })
}

/// Prediction for the anchor month itself.
pub fn current_month(commodity: &Commodity) -> ForecastPoint {
    ForecastPoint::predicted(commodity, commodity.anchor())
}

/// The twelve months ending at the anchor, oldest first.
///
/// Recorded prices are used where present; gaps are backfilled from the model.
pub fn previous_twelve(commodity: &Commodity) -> Vec<HistoricalPoint> {
    let anchor = commodity.anchor();
    let window = i64::from(HISTORY_WINDOW);

    (0..window)
        .map(|i| {
            let period = anchor.add_months(i - (window - 1));
            let (price, source) = match commodity.history().get(period) {
                Some(observed) => (observed, PointSource::Observed),
                None => (commodity.predict(period), PointSource::Predicted),
            };
            HistoricalPoint {
                period,
                label: period.label(),
                price,
                source,
            }
        })
        .collect()
}
