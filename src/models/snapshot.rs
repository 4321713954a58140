//! Leave ledger snapshot model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// The current-state leave ledger row for one employee and one month.
///
/// A snapshot is derived data: it can always be rebuilt from the month's
/// attendance marks plus the previous month's snapshot. It is overwritten in
/// place on every recompute.
///
/// Balances hold `cl_balance == cl_allocated - cl_used` and
/// `el_balance == el_carry_forward + el_earned - el_used`. Either may be
/// negative when more leave was taken than was available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveLedgerSnapshot {
    /// The employee the row belongs to.
    pub employee_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Casual Leave available this month.
    pub cl_allocated: Decimal,
    /// CL days taken this month.
    pub cl_used: u32,
    /// `cl_allocated - cl_used`.
    pub cl_balance: Decimal,
    /// Previous month's closing EL balance, or zero.
    pub el_carry_forward: Decimal,
    /// EL credited this month.
    pub el_earned: Decimal,
    /// EL days taken this month.
    pub el_used: u32,
    /// `el_carry_forward + el_earned - el_used`.
    pub el_balance: Decimal,
    /// Set only when `el_earned` is positive.
    pub el_earn_date: Option<NaiveDate>,
    /// Present-equivalent days (present plus work on holiday).
    pub total_present_days: u32,
    /// Calendar working days in the month.
    pub total_working_days: u32,
}

impl LeaveLedgerSnapshot {
    /// The month this row covers.
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }

    /// Returns true if both balance identities hold.
    pub fn is_consistent(&self) -> bool {
        self.cl_balance == self.cl_allocated - Decimal::from(self.cl_used)
            && self.el_balance
                == self.el_carry_forward + self.el_earned - Decimal::from(self.el_used)
            && (self.el_earned > Decimal::ZERO) == self.el_earn_date.is_some()
    }
}
