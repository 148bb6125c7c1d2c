//! Chronological monthly price series.
//!
//! [`PriceHistory`] is the validated form of a commodity's price table:
//! records are sorted, unique per month and carry finite non-negative prices.
//! Gaps between months are allowed.

use super::error::HistoryError;
use super::period::YearMonth;

/// One observed monthly price.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRecord {
    /// Month of the observation
    pub period: YearMonth,
    /// Observed price
    pub price: f64,
}

impl PriceRecord {
    /// Creates a record (unvalidated; validation happens in [`PriceHistory::new`]).
    pub fn new(period: YearMonth, price: f64) -> Self {
        Self { period, price }
    }
}

/// Validated, chronologically ordered price series.
///
/// # Examples
///
/// ```
/// use mandi_core::types::{HistoryError, PriceHistory, PriceRecord, YearMonth};
///
/// let m = |mo| YearMonth::new(2024, mo).unwrap();
///
/// // Out-of-order input is sorted
/// let history = PriceHistory::new(vec![
///     PriceRecord::new(m(3), 12.0),
///     PriceRecord::new(m(1), 10.0),
/// ])
/// .unwrap();
/// assert_eq!(history.first().period, m(1));
///
/// // Duplicate months are rejected
/// let dup = PriceHistory::new(vec![PriceRecord::new(m(1), 1.0), PriceRecord::new(m(1), 2.0)]);
/// assert!(matches!(dup, Err(HistoryError::DuplicatePeriod { .. })));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    records: Vec<PriceRecord>,
}

impl PriceHistory {
    /// Validates and sorts `records`.
    ///
    /// # Errors
    ///
    /// - `HistoryError::Empty` when no records are supplied
    /// - `HistoryError::InvalidPrice` for negative or non-finite prices
    /// - `HistoryError::DuplicatePeriod` when a month repeats
    pub fn new(mut records: Vec<PriceRecord>) -> Result<Self, HistoryError> {
        if records.is_empty() {
            return Err(HistoryError::Empty);
        }

        for record in &records {
            if !record.price.is_finite() || record.price < 0.0 {
                return Err(HistoryError::InvalidPrice {
                    period: record.period,
                    price: record.price,
                });
            }
        }

        records.sort_by_key(|r| r.period);

        if let Some(pair) = records.windows(2).find(|w| w[0].period == w[1].period) {
            return Err(HistoryError::DuplicatePeriod {
                period: pair[0].period,
            });
        }

        Ok(Self { records })
    }

    /// All records, oldest first.
    #[inline]
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Number of observed months.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed history; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest record.
    pub fn first(&self) -> &PriceRecord {
        &self.records[0]
    }

    /// Most recent record.
    pub fn latest(&self) -> &PriceRecord {
        &self.records[self.records.len() - 1]
    }

    /// Observed price for `period`, if recorded.
    pub fn get(&self, period: YearMonth) -> Option<f64> {
        self.records
            .binary_search_by_key(&period, |r| r.period)
            .ok()
            .map(|idx| self.records[idx].price)
    }

    /// Population variance of the observed prices.
    pub fn price_variance(&self) -> f64 {
        let n = self.records.len() as f64;
        let mean = self.records.iter().map(|r| r.price).sum::<f64>() / n;
        self.records
            .iter()
            .map(|r| (r.price - mean).powi(2))
            .sum::<f64>()
            / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_empty_history_rejected() {
        assert_eq!(PriceHistory::new(vec![]), Err(HistoryError::Empty));
    }

    #[test]
    fn test_negative_and_nan_prices_rejected() {
        let neg = PriceHistory::new(vec![PriceRecord::new(m(2024, 1), -1.0)]);
        assert!(matches!(neg, Err(HistoryError::InvalidPrice { .. })));

        let nan = PriceHistory::new(vec![PriceRecord::new(m(2024, 1), f64::NAN)]);
        assert!(matches!(nan, Err(HistoryError::InvalidPrice { .. })));
    }

    #[test]
    fn test_zero_price_accepted() {
        assert!(PriceHistory::new(vec![PriceRecord::new(m(2024, 1), 0.0)]).is_ok());
    }

    #[test]
    fn test_duplicate_detected_after_sorting() {
        let result = PriceHistory::new(vec![
            PriceRecord::new(m(2024, 2), 1.0),
            PriceRecord::new(m(2024, 1), 1.0),
            PriceRecord::new(m(2024, 2), 3.0),
        ]);
        assert_eq!(
            result,
            Err(HistoryError::DuplicatePeriod { period: m(2024, 2) })
        );
    }

    #[test]
    fn test_gaps_allowed_and_lookup() {
        let history = PriceHistory::new(vec![
            PriceRecord::new(m(2024, 1), 10.0),
            PriceRecord::new(m(2024, 5), 14.0),
        ])
        .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(m(2024, 5)), Some(14.0));
        assert_eq!(history.get(m(2024, 3)), None);
        assert_eq!(history.latest().period, m(2024, 5));
    }

    #[test]
    fn test_price_variance() {
        let history = PriceHistory::new(vec![
            PriceRecord::new(m(2024, 1), 2.0),
            PriceRecord::new(m(2024, 2), 4.0),
        ])
        .unwrap();
        assert_relative_eq!(history.price_variance(), 1.0);
    }
}
