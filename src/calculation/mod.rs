//! Calculation logic for the leave ledger.
//!
//! This module contains the pure functions behind the ledger: calendar day
//! classification, monthly aggregation of attendance marks, and the leave
//! accrual rules that produce a month's ledger snapshot.

mod accrual;
mod day_category;
mod monthly_stats;

pub use accrual::{
    EarnedLeaveAccrual, accrue_earned_leave, build_snapshot, resolve_cl_allocation,
};
pub use day_category::{CalendarDay, DayCategory, classify, month_calendar, week_of_month};
pub use monthly_stats::{MonthStats, aggregate};
