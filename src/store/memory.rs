//! In-memory store implementations.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AttendanceMark, Employee, LeaveLedgerSnapshot, Period};

use super::{AttendanceStore, EmployeeDirectory, LedgerStore};

fn poisoned<T>(_: PoisonError<T>) -> LedgerError {
    LedgerError::storage("in-memory store lock poisoned")
}

/// Attendance marks keyed by employee, then date.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceStore {
    marks: RwLock<HashMap<String, BTreeMap<NaiveDate, AttendanceMark>>>,
}

impl InMemoryAttendanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttendanceStore for InMemoryAttendanceStore {
    fn read_month(&self, employee_id: &str, period: Period) -> LedgerResult<Vec<AttendanceMark>> {
        let marks = self.marks.read().map_err(poisoned)?;
        let (Some(first), Some(last)) = (period.day(1), period.day(period.days_in_month())) else {
            return Err(LedgerError::InvalidPeriod {
                year: period.year,
                month: period.month,
            });
        };

        Ok(marks
            .get(employee_id)
            .map(|days| days.range(first..=last).map(|(_, mark)| mark.clone()).collect())
            .unwrap_or_default())
    }

    fn upsert(&self, mark: AttendanceMark) -> LedgerResult<()> {
        let mut marks = self.marks.write().map_err(poisoned)?;
        marks
            .entry(mark.employee_id.clone())
            .or_default()
            .insert(mark.date, mark);
        Ok(())
    }

    fn remove(&self, employee_id: &str, date: NaiveDate) -> LedgerResult<Option<AttendanceMark>> {
        let mut marks = self.marks.write().map_err(poisoned)?;
        Ok(marks.get_mut(employee_id).and_then(|days| days.remove(&date)))
    }
}

/// Ledger snapshots keyed by (employee, period).
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    snapshots: RwLock<HashMap<(String, Period), LeaveLedgerSnapshot>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn read_snapshot(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<Option<LeaveLedgerSnapshot>> {
        let snapshots = self.snapshots.read().map_err(poisoned)?;
        Ok(snapshots.get(&(employee_id.to_string(), period)).cloned())
    }

    fn write_snapshot(&self, snapshot: LeaveLedgerSnapshot) -> LedgerResult<()> {
        let mut snapshots = self.snapshots.write().map_err(poisoned)?;
        snapshots.insert((snapshot.employee_id.clone(), snapshot.period()), snapshot);
        Ok(())
    }
}

/// A fixed roster of employees.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    employees: RwLock<HashMap<String, Employee>>,
}

impl InMemoryEmployeeDirectory {
    /// Creates a directory holding `employees`.
    pub fn new(employees: impl IntoIterator<Item = Employee>) -> Self {
        Self {
            employees: RwLock::new(
                employees
                    .into_iter()
                    .map(|employee| (employee.id.clone(), employee))
                    .collect(),
            ),
        }
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn find(&self, employee_id: &str) -> LedgerResult<Option<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.get(employee_id).cloned())
    }

    fn list_active(&self) -> LedgerResult<Vec<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        let mut active: Vec<Employee> = employees
            .values()
            .filter(|employee| employee.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(active)
    }
}
