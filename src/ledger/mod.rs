//! Leave ledger orchestration.
//!
//! The [`LedgerEngine`] applies attendance marks and recomputes the affected
//! employee-month's snapshot under a per-(employee, month) lock.

mod engine;
mod locks;
mod summary;

pub use engine::{LedgerEngine, get_prior_snapshot};
pub use locks::KeyedLocks;
pub use summary::{BulkMarkOutcome, EmployeeMonthRollUp, LeaveBalances, MonthlySummary, SummaryView};
