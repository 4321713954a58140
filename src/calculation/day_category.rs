//! Calendar day classification.
//!
//! This module decides whether a date is an ordinary working day, a weekly
//! off, a designated holiday or a working weekend. The rule is fixed policy:
//! every Sunday is off, and Saturdays alternate by week-of-month.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::Period;

/// Represents the category of a calendar day.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::DayCategory;
///
/// assert!(DayCategory::WorkingWeekend.is_working());
/// assert!(DayCategory::WeeklyOff.is_holiday());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCategory {
    /// Monday through Friday.
    OrdinaryWorking,
    /// Every Sunday.
    WeeklyOff,
    /// 1st and 3rd Saturday of the month.
    DesignatedHoliday,
    /// 2nd, 4th and 5th Saturday of the month.
    WorkingWeekend,
}

impl DayCategory {
    /// Returns true if the day counts towards the month's working days.
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            DayCategory::OrdinaryWorking | DayCategory::WorkingWeekend
        )
    }

    /// Returns true if the day is a non-working holiday.
    pub fn is_holiday(&self) -> bool {
        !self.is_working()
    }
}

impl std::fmt::Display for DayCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayCategory::OrdinaryWorking => write!(f, "Ordinary working day"),
            DayCategory::WeeklyOff => write!(f, "Weekly off"),
            DayCategory::DesignatedHoliday => write!(f, "Designated holiday"),
            DayCategory::WorkingWeekend => write!(f, "Working weekend"),
        }
    }
}

/// Returns the block-of-seven week number of `date` within its month.
///
/// Days 1-7 are week 1, 8-14 week 2 and so on, regardless of which weekday
/// the month starts on. Days 29-31 are week 5.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::week_of_month;
/// use chrono::NaiveDate;
///
/// assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()), 1);
/// assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()), 2);
/// assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 6, 29).unwrap()), 5);
/// ```
pub fn week_of_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

/// Determines the category of a calendar date.
///
/// - Sunday: [`DayCategory::WeeklyOff`]
/// - Saturday in week 1 or 3: [`DayCategory::DesignatedHoliday`]
/// - Saturday in week 2, 4 or 5: [`DayCategory::WorkingWeekend`]
/// - Anything else: [`DayCategory::OrdinaryWorking`]
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::{classify, DayCategory};
/// use chrono::NaiveDate;
///
/// // June 2024 starts on a Saturday.
/// let first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert_eq!(classify(first), DayCategory::DesignatedHoliday);
///
/// let second_saturday = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
/// assert_eq!(classify(second_saturday), DayCategory::WorkingWeekend);
///
/// let sunday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
/// assert_eq!(classify(sunday), DayCategory::WeeklyOff);
/// ```
pub fn classify(date: NaiveDate) -> DayCategory {
    match date.weekday() {
        Weekday::Sun => DayCategory::WeeklyOff,
        Weekday::Sat => match week_of_month(date) {
            1 | 3 => DayCategory::DesignatedHoliday,
            _ => DayCategory::WorkingWeekend,
        },
        _ => DayCategory::OrdinaryWorking,
    }
}

/// One day of a month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The date.
    pub date: NaiveDate,
    /// Day of the week, e.g. "Saturday".
    pub weekday: String,
    /// The day's category.
    pub category: DayCategory,
}

/// Lays out every day of `period` with its category.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::{month_calendar, DayCategory};
/// use leave_ledger::models::Period;
///
/// let days = month_calendar(Period::new(2024, 6).unwrap());
/// assert_eq!(days.len(), 30);
/// assert_eq!(days[0].weekday, "Saturday");
/// assert_eq!(days[0].category, DayCategory::DesignatedHoliday);
/// ```
pub fn month_calendar(period: Period) -> Vec<CalendarDay> {
    period
        .dates()
        .map(|date| CalendarDay {
            date,
            weekday: weekday_name(date.weekday()).to_string(),
            category: classify(date),
        })
        .collect()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
