//! Read-side views returned by the ledger engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{CalendarDay, MonthStats};
use crate::config::LeavePolicy;
use crate::models::{AttendanceMark, Employee, LeaveLedgerSnapshot};

/// Leave balances as shown on the monthly summary.
///
/// Usage comes from the freshly aggregated marks; allocation, carry-forward
/// and earned EL come from the last written snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalances {
    /// CL available this month.
    pub cl_allocated: Decimal,
    /// CL days taken.
    pub cl_used: u32,
    /// `cl_allocated - cl_used`.
    pub cl_balance: Decimal,
    /// Opening EL balance.
    pub el_carry_forward: Decimal,
    /// EL credited this month.
    pub el_earned: Decimal,
    /// EL days taken.
    pub el_used: u32,
    /// `el_carry_forward + el_earned - el_used`.
    pub el_balance: Decimal,
    /// Marker date for the EL credit.
    pub el_earn_date: Option<NaiveDate>,
}

impl LeaveBalances {
    /// Merges the stored snapshot (if any) with current usage counts.
    pub fn from_stored(
        stats: &MonthStats,
        snapshot: Option<&LeaveLedgerSnapshot>,
        policy: &LeavePolicy,
    ) -> Self {
        let cl_allocated = snapshot
            .map(|s| s.cl_allocated)
            .unwrap_or(policy.cl_allocated_per_month);
        let el_carry_forward = snapshot.map(|s| s.el_carry_forward).unwrap_or_default();
        let el_earned = snapshot.map(|s| s.el_earned).unwrap_or_default();

        Self {
            cl_allocated,
            cl_used: stats.cl_taken,
            cl_balance: cl_allocated - Decimal::from(stats.cl_taken),
            el_carry_forward,
            el_earned,
            el_used: stats.el_taken,
            el_balance: el_carry_forward + el_earned - Decimal::from(stats.el_taken),
            el_earn_date: snapshot.and_then(|s| s.el_earn_date),
        }
    }
}

/// Month statistics and leave balances, flattened into one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
    /// Calendar and attendance counters.
    #[serde(flatten)]
    pub stats: MonthStats,
    /// Leave balances.
    #[serde(flatten)]
    pub leave: LeaveBalances,
}

/// Everything needed to render one employee's month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The employee.
    pub employee: Employee,
    /// The month's marks, ordered by date.
    pub attendance: Vec<AttendanceMark>,
    /// Every day of the month with its category.
    pub calendar: Vec<CalendarDay>,
    /// Counters and balances.
    pub summary: SummaryView,
}

/// One row of the all-employee month roll-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeMonthRollUp {
    /// Employee id.
    pub employee_id: String,
    /// Employee name.
    pub name: String,
    /// Job title, if recorded.
    pub designation: Option<String>,
    /// Department, if recorded.
    pub department: Option<String>,
    /// Days with any mark.
    pub marked_days: u32,
    /// Present-equivalent days.
    pub present_days: u32,
    /// Leave days of any type.
    pub leave_days: u32,
}

/// Result of one entry in a bulk mark request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMarkOutcome {
    /// The employee the entry targeted.
    pub employee_id: String,
    /// The day the entry targeted.
    pub date: NaiveDate,
    /// Whether the mark was written and its month recomputed.
    pub success: bool,
    /// Why the entry failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
