//! Calendar month used as the ledger's unit of accrual.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// A validated (year, month) pair.
///
/// Months form a forward-linked chain per employee: each month's Earned
/// Leave opening balance is the previous month's closing balance.
///
/// # Example
///
/// ```
/// use leave_ledger::models::Period;
///
/// let january = Period::new(2025, 1).unwrap();
/// assert_eq!(january.previous(), Period::new(2024, 12).unwrap());
/// assert_eq!(january.days_in_month(), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1-12 and years chrono cannot represent.
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or(LedgerError::InvalidPeriod { year, month })
    }

    /// The period containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The preceding month; January rolls back to December of the prior year.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The following month; December rolls over to January of the next year.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The given day of this month, if it exists.
    pub fn day(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Number of days in the month (28-31).
    pub fn days_in_month(self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| self.day(day).is_some())
            .unwrap_or(28)
    }

    /// Every date of the month in order.
    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        (1..=self.days_in_month()).filter_map(move |day| self.day(day))
    }

    /// Returns true if `date` falls in this month.
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(year: i32, month: u32) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        assert!(matches!(
            Period::new(2024, 0),
            Err(LedgerError::InvalidPeriod { year: 2024, month: 0 })
        ));
        assert!(matches!(
            Period::new(2024, 13),
            Err(LedgerError::InvalidPeriod { month: 13, .. })
        ));
    }

    #[test]
    fn test_previous_wraps_january_to_december() {
        assert_eq!(period(2025, 1).previous(), period(2024, 12));
        assert_eq!(period(2024, 7).previous(), period(2024, 6));
    }

    #[test]
    fn test_next_wraps_december_to_january() {
        assert_eq!(period(2024, 12).next(), period(2025, 1));
        assert_eq!(period(2024, 6).next(), period(2024, 7));
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(period(2024, 2).days_in_month(), 29);
        assert_eq!(period(2023, 2).days_in_month(), 28);
        assert_eq!(period(2100, 2).days_in_month(), 28);
        assert_eq!(period(2024, 6).days_in_month(), 30);
        assert_eq!(period(2024, 12).days_in_month(), 31);
    }

    #[test]
    fn test_dates_cover_whole_month() {
        let dates: Vec<_> = period(2024, 6).dates().collect();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(dates[29], NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_of_and_contains() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(Period::of(date), period(2024, 3));
        assert!(period(2024, 3).contains(date));
        assert!(!period(2023, 3).contains(date));
    }

    #[test]
    fn test_display_pads_month() {
        assert_eq!(period(2024, 6).to_string(), "2024-06");
    }
}
