//! Leave accrual rules.
//!
//! This module turns a month's [`MonthStats`] and the previous month's
//! closing balance into a new [`LeaveLedgerSnapshot`]. It performs no I/O;
//! the ledger engine fetches the inputs and stores the result.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::LeavePolicy;
use crate::models::{LeaveLedgerSnapshot, Period};

use super::MonthStats;

/// The Earned Leave credited for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarnedLeaveAccrual {
    /// EL credited; zero below the threshold.
    pub earned: Decimal,
    /// Marker date, set only when `earned` is positive.
    pub earn_date: Option<NaiveDate>,
}

/// Applies the EL accrual rule to a month.
///
/// EL is credited when `present_days` reaches the policy threshold. The earn
/// date is the day of the month numbered by the present-day count (22 present
/// days in June gives June 22nd); it marks that accrual happened rather than
/// when.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::{accrue_earned_leave, MonthStats};
/// use leave_ledger::config::LeavePolicy;
/// use leave_ledger::models::Period;
/// use rust_decimal::Decimal;
///
/// let period = Period::new(2024, 6).unwrap();
/// let stats = MonthStats { present_days: 20, ..MonthStats::default() };
///
/// let accrual = accrue_earned_leave(&stats, period, &LeavePolicy::default());
/// assert_eq!(accrual.earned, Decimal::new(125, 2));
/// assert_eq!(accrual.earn_date, period.day(20));
/// ```
pub fn accrue_earned_leave(
    stats: &MonthStats,
    period: Period,
    policy: &LeavePolicy,
) -> EarnedLeaveAccrual {
    let threshold_met = stats.present_days >= policy.el_accrual_threshold_days;
    if !threshold_met || policy.el_accrual_per_month <= Decimal::ZERO {
        return EarnedLeaveAccrual {
            earned: Decimal::ZERO,
            earn_date: None,
        };
    }

    // present_days never exceeds the month length when marks are one per day
    let earn_date = period
        .day(stats.present_days)
        .or_else(|| period.day(period.days_in_month()));

    EarnedLeaveAccrual {
        earned: policy.el_accrual_per_month,
        earn_date,
    }
}

/// Picks the CL allocation for a month.
///
/// An explicit override wins, then whatever the month's existing snapshot
/// already records, then the policy constant.
pub fn resolve_cl_allocation(
    override_allocation: Option<Decimal>,
    existing: Option<&LeaveLedgerSnapshot>,
    policy: &LeavePolicy,
) -> Decimal {
    override_allocation
        .or_else(|| existing.map(|snapshot| snapshot.cl_allocated))
        .unwrap_or(policy.cl_allocated_per_month)
}

/// Builds the ledger snapshot for one employee-month.
///
/// `prior` is the previous month's snapshot; its `el_balance` becomes this
/// month's carry-forward, or zero when there is none. Balances are allowed to
/// go negative.
pub fn build_snapshot(
    employee_id: &str,
    period: Period,
    stats: &MonthStats,
    prior: Option<&LeaveLedgerSnapshot>,
    cl_allocated: Decimal,
    policy: &LeavePolicy,
) -> LeaveLedgerSnapshot {
    let el_carry_forward = prior
        .map(|snapshot| snapshot.el_balance)
        .unwrap_or(Decimal::ZERO);
    let accrual = accrue_earned_leave(stats, period, policy);

    let cl_balance = cl_allocated - Decimal::from(stats.cl_taken);
    let el_balance = el_carry_forward + accrual.earned - Decimal::from(stats.el_taken);

    LeaveLedgerSnapshot {
        employee_id: employee_id.to_string(),
        year: period.year,
        month: period.month,
        cl_allocated,
        cl_used: stats.cl_taken,
        cl_balance,
        el_carry_forward,
        el_earned: accrual.earned,
        el_used: stats.el_taken,
        el_balance,
        el_earn_date: accrual.earn_date,
        total_present_days: stats.present_days,
        total_working_days: stats.working_days,
    }
}
