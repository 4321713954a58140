//! Monthly attendance aggregation.
//!
//! This module folds one employee's attendance marks for a month into the
//! counters the leave ledger and the monthly summary are built from.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LedgerResult;
use crate::models::{AttendanceMark, DayRecord, LeaveType, Period};

use super::{DayCategory, classify};

/// Calendar and attendance counters for one employee-month.
///
/// The calendar counters depend only on the month; the attendance counters
/// depend only on the marks. Unmarked days contribute to no attendance
/// counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStats {
    /// Days in the month.
    pub total_days: u32,
    /// Weekly-off days (Sundays).
    pub sundays: u32,
    /// Designated holiday Saturdays (1st and 3rd).
    pub holiday_saturdays: u32,
    /// Working Saturdays (2nd, 4th, 5th).
    pub working_saturdays: u32,
    /// `total_days - sundays - holiday_saturdays`.
    pub working_days: u32,
    /// Marks with status present or work on holiday.
    pub present_days: u32,
    /// Marks with status holiday.
    pub holiday_days: u32,
    /// Marks with status work on holiday.
    pub work_on_holiday_earned: u32,
    /// Marks with status leave, of any type.
    pub leave_days: u32,
    /// Leave marks of type CL.
    pub cl_taken: u32,
    /// Leave marks of type EL.
    pub el_taken: u32,
    /// Leave marks that redeem a work-on-holiday credit.
    pub work_on_holiday_used: u32,
    /// `work_on_holiday_earned - work_on_holiday_used`; negative when overdrawn.
    pub work_on_holiday_balance: i64,
}

impl MonthStats {
    /// Number of marked days (any status).
    pub fn marked_days(&self) -> u32 {
        self.present_days + self.holiday_days + self.leave_days
    }

    fn record(&mut self, record: DayRecord) {
        match record {
            DayRecord::Present => self.present_days += 1,
            DayRecord::Holiday => self.holiday_days += 1,
            DayRecord::WorkOnHoliday => {
                self.present_days += 1;
                self.work_on_holiday_earned += 1;
            }
            DayRecord::Leave(leave_type) => {
                self.leave_days += 1;
                match leave_type {
                    LeaveType::Cl => self.cl_taken += 1,
                    LeaveType::El => self.el_taken += 1,
                    LeaveType::WorkOnHoliday => self.work_on_holiday_used += 1,
                }
            }
        }
    }
}

/// Aggregates a month's attendance marks for one employee.
///
/// Every day of the month is classified for the calendar counters. Marks are
/// then folded into the attendance counters. Marks dated outside the month
/// are skipped with a warning.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidPeriod`](crate::error::LedgerError::InvalidPeriod)
/// if `(year, month)` is not a real month.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::aggregate;
/// use leave_ledger::models::{AttendanceMark, DayRecord, LeaveType};
/// use chrono::NaiveDate;
///
/// let marks = vec![
///     AttendanceMark::new("emp_001", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), DayRecord::Present),
///     AttendanceMark::new("emp_001", NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(), DayRecord::Leave(LeaveType::Cl)),
/// ];
///
/// let stats = aggregate(&marks, 2024, 6).unwrap();
/// assert_eq!(stats.total_days, 30);
/// assert_eq!(stats.working_days, 23);
/// assert_eq!(stats.present_days, 1);
/// assert_eq!(stats.cl_taken, 1);
/// ```
pub fn aggregate(marks: &[AttendanceMark], year: i32, month: u32) -> LedgerResult<MonthStats> {
    let period = Period::new(year, month)?;
    let mut stats = MonthStats::default();

    for date in period.dates() {
        stats.total_days += 1;
        match classify(date) {
            DayCategory::WeeklyOff => stats.sundays += 1,
            DayCategory::DesignatedHoliday => stats.holiday_saturdays += 1,
            DayCategory::WorkingWeekend => stats.working_saturdays += 1,
            DayCategory::OrdinaryWorking => {}
        }
    }
    stats.working_days = stats.total_days - stats.sundays - stats.holiday_saturdays;

    for mark in marks {
        if !period.contains(mark.date) {
            warn!(
                employee_id = %mark.employee_id,
                date = %mark.date,
                period = %period,
                "Skipping attendance mark outside the aggregated month"
            );
            continue;
        }
        stats.record(mark.record);
    }

    stats.work_on_holiday_balance =
        i64::from(stats.work_on_holiday_earned) - i64::from(stats.work_on_holiday_used);

    Ok(stats)
}
