//! Time-position features.
//!
//! Every model sees time through the same two quantities:
//! - the trend position `t`, months since the first observation (scaled to years)
//! - the calendar month, encoded cyclically as `sin(2πk(m-1)/12)`, `cos(2πk(m-1)/12)`

use std::f64::consts::PI;

use mandi_core::types::YearMonth;

/// Maps a month to a regression row `[1, t, sin₁, cos₁, …, sin_H, cos_H]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureMap {
    origin: YearMonth,
    harmonics: usize,
}

impl FeatureMap {
    /// Features relative to `origin` with `harmonics` seasonal pairs.
    pub fn new(origin: YearMonth, harmonics: usize) -> Self {
        Self { origin, harmonics }
    }

    /// Month at which `t = 0`.
    pub fn origin(&self) -> YearMonth {
        self.origin
    }

    /// Number of seasonal harmonics.
    pub fn harmonics(&self) -> usize {
        self.harmonics
    }

    /// Number of columns in a row.
    pub fn width(&self) -> usize {
        2 + 2 * self.harmonics
    }

    /// Months since origin, in years.
    #[inline]
    pub fn trend(&self, period: YearMonth) -> f64 {
        period.months_since(self.origin) as f64 / 12.0
    }

    /// Full regression row for `period`.
    pub fn row(&self, period: YearMonth) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        row.push(self.trend(period));

        let phase = 2.0 * PI * f64::from(period.month() - 1) / 12.0;
        for k in 1..=self.harmonics {
            let angle = phase * k as f64;
            row.push(angle.sin());
            row.push(angle.cos());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_row_layout() {
        let origin = YearMonth::new(2024, 1).unwrap();
        let map = FeatureMap::new(origin, 2);
        assert_eq!(map.width(), 6);

        let row = map.row(origin);
        assert_eq!(row.len(), 6);
        assert_relative_eq!(row[0], 1.0);
        assert_relative_eq!(row[1], 0.0);
        // January: phase 0
        assert_relative_eq!(row[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(row[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trend_in_years_and_seasonality_repeats() {
        let origin = YearMonth::new(2024, 1).unwrap();
        let map = FeatureMap::new(origin, 1);

        let april = YearMonth::new(2024, 4).unwrap();
        let next_april = YearMonth::new(2025, 4).unwrap();

        assert_relative_eq!(map.trend(april), 0.25);
        assert_relative_eq!(map.trend(next_april), 1.25);

        let a = map.row(april);
        let b = map.row(next_april);
        assert_relative_eq!(a[2], b[2], epsilon = 1e-12);
        assert_relative_eq!(a[3], b[3], epsilon = 1e-12);
    }

    #[test]
    fn test_trend_only_map() {
        let origin = YearMonth::new(2024, 6).unwrap();
        let map = FeatureMap::new(origin, 0);
        assert_eq!(map.row(origin.pred()), vec![1.0, -1.0 / 12.0]);
    }
}
