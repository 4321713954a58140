//! Collaborator stores the ledger engine reads from and writes to.
//!
//! Persistence is outside the engine; these traits are the seams a durable
//! backend plugs into. In-memory implementations are provided for the
//! server binary and for tests.

mod memory;

use chrono::NaiveDate;

use crate::error::LedgerResult;
use crate::models::{AttendanceMark, Employee, LeaveLedgerSnapshot, Period};

pub use memory::{InMemoryAttendanceStore, InMemoryEmployeeDirectory, InMemoryLedgerStore};

/// Holds one attendance mark per (employee, date).
pub trait AttendanceStore: Send + Sync {
    /// All marks for the employee in the month, ordered by date.
    fn read_month(&self, employee_id: &str, period: Period) -> LedgerResult<Vec<AttendanceMark>>;

    /// Inserts or overwrites the mark for `(mark.employee_id, mark.date)`.
    fn upsert(&self, mark: AttendanceMark) -> LedgerResult<()>;

    /// Removes the mark for the day, returning it if it existed.
    fn remove(&self, employee_id: &str, date: NaiveDate) -> LedgerResult<Option<AttendanceMark>>;
}

/// Holds one leave ledger snapshot per (employee, year, month).
pub trait LedgerStore: Send + Sync {
    /// The snapshot for the month, if one has been written.
    fn read_snapshot(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<Option<LeaveLedgerSnapshot>>;

    /// Inserts or overwrites the snapshot for its (employee, year, month).
    fn write_snapshot(&self, snapshot: LeaveLedgerSnapshot) -> LedgerResult<()>;
}

/// Read-only view of the HR employee records.
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up an employee by id.
    fn find(&self, employee_id: &str) -> LedgerResult<Option<Employee>>;

    /// All active employees.
    fn list_active(&self) -> LedgerResult<Vec<Employee>>;
}
