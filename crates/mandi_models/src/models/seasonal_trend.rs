//! Trend-plus-seasonality regression.
//!
//! ```text
//! price(t, m) = β₀ + β₁·t + Σₖ (aₖ·sin(2πk(m-1)/12) + bₖ·cos(2πk(m-1)/12))
//! ```
//!
//! Coefficients are fitted by least squares with a small ridge penalty on all
//! non-intercept terms, which keeps short or gappy histories solvable.
//! Seasonal pairs are only used when the history has enough observations to
//! identify them (`n ≥ 3 + 2H`); otherwise the harmonic count is reduced,
//! down to a pure trend line.

use mandi_core::math::solvers::least_squares;
use mandi_core::types::{PriceHistory, YearMonth};

use super::features::FeatureMap;
use crate::error::TrainingError;

/// Fitted trend + seasonal model.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalTrendModel {
    features: FeatureMap,
    coefficients: Vec<f64>,
    r_squared: f64,
}

impl SeasonalTrendModel {
    /// Fit to `history` with up to `harmonics` seasonal pairs.
    ///
    /// # Errors
    ///
    /// - `TrainingError::InsufficientHistory` for fewer than 2 observations
    /// - `TrainingError::Solver` if the normal equations cannot be solved
    /// - `TrainingError::NumericalInstability` for non-finite coefficients
    pub fn fit(
        history: &PriceHistory,
        harmonics: usize,
        ridge: f64,
    ) -> Result<Self, TrainingError> {
        let n = history.len();
        if n < 2 {
            return Err(TrainingError::InsufficientHistory { got: n, need: 2 });
        }

        let usable = harmonics.min(n.saturating_sub(3) / 2);
        let features = FeatureMap::new(history.first().period, usable);

        let design: Vec<Vec<f64>> = history
            .records()
            .iter()
            .map(|r| features.row(r.period))
            .collect();
        let targets: Vec<f64> = history.records().iter().map(|r| r.price).collect();

        let coefficients = least_squares(&design, &targets, ridge)?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(TrainingError::NumericalInstability(format!(
                "non-finite coefficients {:?}",
                coefficients
            )));
        }

        let ss_res: f64 = design
            .iter()
            .zip(&targets)
            .map(|(row, y)| (y - dot(row, &coefficients)).powi(2))
            .sum();
        let ss_tot = history.price_variance() * n as f64;
        let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

        Ok(Self {
            features,
            coefficients,
            r_squared,
        })
    }

    /// Predicted price for `period`, floored at zero.
    pub fn predict(&self, period: YearMonth) -> f64 {
        dot(&self.features.row(period), &self.coefficients).max(0.0)
    }

    /// Harmonic count actually used (may be lower than requested).
    pub fn harmonics(&self) -> usize {
        self.features.harmonics()
    }

    /// In-sample coefficient of determination.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Monthly trend slope (price units per month).
    pub fn monthly_slope(&self) -> f64 {
        self.coefficients[1] / 12.0
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
