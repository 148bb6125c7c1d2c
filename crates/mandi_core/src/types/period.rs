//! Calendar-month time index.
//!
//! Price tables are monthly, so the whole engine indexes time by
//! [`YearMonth`] rather than by day. Months map to a linear ordinal
//! (`year * 12 + month - 1`) which makes month arithmetic exact.
//!
//! # Examples
//!
//! ```
//! use mandi_core::types::period::YearMonth;
//!
//! let nov = YearMonth::new(2024, 11).unwrap();
//! assert_eq!(nov.add_months(3), YearMonth::new(2025, 2).unwrap());
//! assert_eq!(nov.label(), "Nov 2024");
//!
//! let parsed: YearMonth = "2024-11".parse().unwrap();
//! assert_eq!(parsed, nov);
//! ```

use chrono::{Datelike, Local};
use std::fmt;
use std::str::FromStr;

use super::error::YearMonthError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month.
///
/// Ordering is chronological (year first, then month).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, rejecting `month` outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Linear month index: `year * 12 + (month - 1)`.
    #[inline]
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }

    /// Inverse of [`YearMonth::ordinal`].
    pub fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// Shifts by `months` (negative values move backwards).
    pub fn add_months(&self, months: i64) -> Self {
        Self::from_ordinal(self.ordinal() + months)
    }

    /// The following month.
    pub fn succ(&self) -> Self {
        self.add_months(1)
    }

    /// The preceding month.
    pub fn pred(&self) -> Self {
        self.add_months(-1)
    }

    /// Signed number of months from `earlier` to `self`.
    pub fn months_since(&self, earlier: YearMonth) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    /// Human-readable label, e.g. `"Nov 2024"`.
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_ABBREVIATIONS[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| YearMonthError::ParseError(format!("expected YYYY-MM, got '{}'", s)))?;

        let year: i32 = year
            .parse()
            .map_err(|_| YearMonthError::ParseError(format!("invalid year in '{}'", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| YearMonthError::ParseError(format!("invalid month in '{}'", s)))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
