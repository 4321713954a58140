//! The ledger recalculator.
//!
//! [`LedgerEngine`] is the only writer of leave ledger snapshots. Every
//! attendance change goes through it so that the mark write and the month's
//! recompute happen under the same per-(employee, month) lock.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{aggregate, build_snapshot, month_calendar, resolve_cl_allocation};
use crate::config::LeavePolicy;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AttendanceMark, DayRecord, Employee, LeaveLedgerSnapshot, MarkDayRequest, Period,
};
use crate::store::{
    AttendanceStore, EmployeeDirectory, InMemoryAttendanceStore, InMemoryEmployeeDirectory,
    InMemoryLedgerStore, LedgerStore,
};

use super::locks::KeyedLocks;
use super::summary::{
    BulkMarkOutcome, EmployeeMonthRollUp, LeaveBalances, MonthlySummary, SummaryView,
};

type LedgerKey = (String, Period);

/// Looks up the snapshot for the month before `period`.
///
/// January looks at December of the previous year. `None` means there is no
/// carry-forward.
pub fn get_prior_snapshot(
    store: &dyn LedgerStore,
    employee_id: &str,
    period: Period,
) -> LedgerResult<Option<LeaveLedgerSnapshot>> {
    store.read_snapshot(employee_id, period.previous())
}

/// Marks attendance and keeps each employee-month's leave snapshot current.
///
/// A mark change recomputes only the month it falls in. Later months whose
/// carry-forward depends on it are not touched; call
/// [`LedgerEngine::recompute_forward`] after editing history.
///
/// # Example
///
/// ```
/// use leave_ledger::config::LeavePolicy;
/// use leave_ledger::ledger::LedgerEngine;
/// use leave_ledger::models::{DayRecord, Employee, LeaveType};
/// use chrono::NaiveDate;
///
/// let engine = LedgerEngine::in_memory([Employee::new("emp_001", "Asha Rao")], LeavePolicy::default());
/// let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
///
/// let snapshot = engine
///     .mark_day("emp_001", date, DayRecord::Leave(LeaveType::Cl), None)
///     .unwrap();
/// assert_eq!(snapshot.cl_used, 1);
/// assert_eq!(snapshot.cl_balance, rust_decimal::Decimal::ZERO);
/// ```
pub struct LedgerEngine {
    employees: Arc<dyn EmployeeDirectory>,
    attendance: Arc<dyn AttendanceStore>,
    ledger: Arc<dyn LedgerStore>,
    policy: LeavePolicy,
    locks: KeyedLocks<LedgerKey>,
}

impl LedgerEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        attendance: Arc<dyn AttendanceStore>,
        ledger: Arc<dyn LedgerStore>,
        policy: LeavePolicy,
    ) -> Self {
        Self {
            employees,
            attendance,
            ledger,
            policy,
            locks: KeyedLocks::new(),
        }
    }

    /// Creates an engine backed by in-memory stores with a fixed roster.
    pub fn in_memory(employees: impl IntoIterator<Item = Employee>, policy: LeavePolicy) -> Self {
        Self::new(
            Arc::new(InMemoryEmployeeDirectory::new(employees)),
            Arc::new(InMemoryAttendanceStore::new()),
            Arc::new(InMemoryLedgerStore::new()),
            policy,
        )
    }

    /// The leave policy in force.
    pub fn policy(&self) -> &LeavePolicy {
        &self.policy
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Validates a flat mark request and applies it with [`Self::mark_day`].
    ///
    /// Nothing is written if the status or leave type is invalid.
    pub fn mark(&self, request: MarkDayRequest) -> LedgerResult<LeaveLedgerSnapshot> {
        let mark = request.into_mark()?;
        self.mark_day(&mark.employee_id, mark.date, mark.record, mark.remarks)
    }

    /// Writes (or overwrites) one day's mark and recomputes its month.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmployeeNotFound`] if the employee is unknown; nothing is written.
    /// - [`LedgerError::Storage`] if a store fails. The day's previous mark is
    ///   put back, so the stored marks still match the stored snapshot.
    pub fn mark_day(
        &self,
        employee_id: &str,
        date: NaiveDate,
        record: DayRecord,
        remarks: Option<String>,
    ) -> LedgerResult<LeaveLedgerSnapshot> {
        self.require_employee(employee_id)?;
        let period = Period::of(date);

        self.locked(employee_id, period, || {
            let previous = self.attendance.remove(employee_id, date)?;
            let applied = self
                .attendance
                .upsert(AttendanceMark {
                    employee_id: employee_id.to_string(),
                    date,
                    record,
                    remarks,
                })
                .and_then(|()| {
                    info!(
                        employee_id = %employee_id,
                        date = %date,
                        status = %record.status(),
                        leave_type = ?record.leave_type(),
                        "Attendance marked"
                    );
                    self.recompute_locked(employee_id, period, None)
                });

            applied.inspect_err(|_| self.restore_mark(employee_id, date, previous))
        })
    }

    /// Applies each request independently.
    ///
    /// A failing entry does not stop the others; its outcome carries the error.
    pub fn mark_bulk(&self, requests: Vec<MarkDayRequest>) -> Vec<BulkMarkOutcome> {
        requests
            .into_iter()
            .map(|request| {
                let employee_id = request.employee_id.clone();
                let date = request.date;
                match self.mark(request) {
                    Ok(_) => BulkMarkOutcome {
                        employee_id,
                        date,
                        success: true,
                        error: None,
                    },
                    Err(err) => {
                        warn!(employee_id = %employee_id, date = %date, error = %err, "Bulk mark entry failed");
                        BulkMarkOutcome {
                            employee_id,
                            date,
                            success: false,
                            error: Some(err.to_string()),
                        }
                    }
                }
            })
            .collect()
    }

    /// Deletes one day's mark and recomputes its month.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MarkNotFound`] if there is no mark for that day. On a
    /// storage failure during the recompute the mark is restored.
    pub fn delete_mark(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<LeaveLedgerSnapshot> {
        self.require_employee(employee_id)?;
        let period = Period::of(date);

        self.locked(employee_id, period, || {
            let removed = self.attendance.remove(employee_id, date)?.ok_or_else(|| {
                LedgerError::MarkNotFound {
                    employee_id: employee_id.to_string(),
                    date,
                }
            })?;
            info!(employee_id = %employee_id, date = %date, "Attendance mark deleted");

            self.recompute_locked(employee_id, period, None)
                .inspect_err(|_| self.restore_mark(employee_id, date, Some(removed)))
        })
    }

    /// Overrides the month's CL allocation and recomputes it.
    ///
    /// The override sticks to the month's snapshot: later recomputes keep it.
    pub fn set_cl_allocation(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
        allocation: Decimal,
    ) -> LedgerResult<LeaveLedgerSnapshot> {
        if allocation.is_sign_negative() {
            return Err(LedgerError::validation("cl_allocated", "must not be negative"));
        }
        let period = Period::new(year, month)?;
        self.require_employee(employee_id)?;

        self.locked(employee_id, period, || {
            self.recompute_locked(employee_id, period, Some(allocation))
        })
    }

    // ------------------------------------------------------------------
    // Recompute
    // ------------------------------------------------------------------

    /// Rebuilds and stores the snapshot for one employee-month.
    ///
    /// Reads the month's marks, aggregates them, carries forward the previous
    /// month's EL balance, applies accrual, then overwrites the snapshot in a
    /// single write. Any failure before that write leaves the stored snapshot
    /// untouched.
    pub fn recompute(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> LedgerResult<LeaveLedgerSnapshot> {
        let period = Period::new(year, month)?;
        self.require_employee(employee_id)?;

        self.locked(employee_id, period, || {
            self.recompute_locked(employee_id, period, None)
        })
    }

    /// Recomputes `from` and every following month that has data.
    ///
    /// Walks forward one month at a time and stops at the first month with
    /// neither marks nor a snapshot. Returns the snapshots in month order.
    pub fn recompute_forward(
        &self,
        employee_id: &str,
        from_year: i32,
        from_month: u32,
    ) -> LedgerResult<Vec<LeaveLedgerSnapshot>> {
        let from = Period::new(from_year, from_month)?;
        self.require_employee(employee_id)?;

        let mut period = from;

        let mut written = Vec::new();
        loop {
            written.push(self.locked(employee_id, period, || {
                self.recompute_locked(employee_id, period, None)
            })?);

            period = period.next();
            if !self.has_month_data(employee_id, period)? {
                break;
            }
        }

        info!(
            employee_id = %employee_id,
            from = %from,
            months = written.len(),
            "Forward recompute complete"
        );
        Ok(written)
    }

    fn recompute_locked(
        &self,
        employee_id: &str,
        period: Period,
        cl_override: Option<Decimal>,
    ) -> LedgerResult<LeaveLedgerSnapshot> {
        let marks = self.attendance.read_month(employee_id, period)?;
        let stats = aggregate(&marks, period.year, period.month)?;
        let prior = get_prior_snapshot(self.ledger.as_ref(), employee_id, period)?;
        let existing = self.ledger.read_snapshot(employee_id, period)?;

        let cl_allocated = resolve_cl_allocation(cl_override, existing.as_ref(), &self.policy);
        let snapshot = build_snapshot(
            employee_id,
            period,
            &stats,
            prior.as_ref(),
            cl_allocated,
            &self.policy,
        );

        if snapshot.el_balance.is_sign_negative() || stats.work_on_holiday_balance < 0 {
            debug!(
                employee_id = %employee_id,
                period = %period,
                el_balance = %snapshot.el_balance,
                work_on_holiday_balance = stats.work_on_holiday_balance,
                "Leave balance overdrawn"
            );
        }

        self.ledger.write_snapshot(snapshot.clone())?;
        info!(
            employee_id = %employee_id,
            period = %period,
            present_days = snapshot.total_present_days,
            el_balance = %snapshot.el_balance,
            cl_balance = %snapshot.cl_balance,
            "Leave ledger recomputed"
        );
        Ok(snapshot)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// The snapshot for the month before `(year, month)`, if any.
    pub fn get_prior_snapshot(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> LedgerResult<Option<LeaveLedgerSnapshot>> {
        let period = Period::new(year, month)?;
        get_prior_snapshot(self.ledger.as_ref(), employee_id, period)
    }

    /// The stored snapshot for `(year, month)`, if any.
    pub fn get_snapshot(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> LedgerResult<Option<LeaveLedgerSnapshot>> {
        let period = Period::new(year, month)?;
        self.ledger.read_snapshot(employee_id, period)
    }

    /// The employee's month: marks, calendar, counters and balances.
    ///
    /// Read-only. Counters are aggregated fresh from the marks; allocation,
    /// carry-forward and earned EL come from the last written snapshot.
    pub fn get_monthly_summary(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> LedgerResult<MonthlySummary> {
        let period = Period::new(year, month)?;
        let employee = self.require_employee(employee_id)?;

        let attendance = self.attendance.read_month(employee_id, period)?;
        let stats = aggregate(&attendance, year, month)?;
        let snapshot = self.ledger.read_snapshot(employee_id, period)?;
        let leave = LeaveBalances::from_stored(&stats, snapshot.as_ref(), &self.policy);

        Ok(MonthlySummary {
            employee,
            attendance,
            calendar: month_calendar(period),
            summary: SummaryView { stats, leave },
        })
    }

    /// Attendance counts for every active employee in the month.
    pub fn month_roll_up(&self, year: i32, month: u32) -> LedgerResult<Vec<EmployeeMonthRollUp>> {
        let period = Period::new(year, month)?;

        self.employees
            .list_active()?
            .into_iter()
            .map(|employee| {
                let marks = self.attendance.read_month(&employee.id, period)?;
                let stats = aggregate(&marks, year, month)?;
                Ok(EmployeeMonthRollUp {
                    employee_id: employee.id,
                    name: employee.name,
                    designation: employee.designation,
                    department: employee.department,
                    marked_days: stats.marked_days(),
                    present_days: stats.present_days,
                    leave_days: stats.leave_days,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn require_employee(&self, employee_id: &str) -> LedgerResult<Employee> {
        self.employees
            .find(employee_id)?
            .ok_or_else(|| LedgerError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Puts the day back as it was before a failed write.
    ///
    /// Must run under the month's lock.
    fn restore_mark(&self, employee_id: &str, date: NaiveDate, previous: Option<AttendanceMark>) {
        let restored = match previous {
            Some(mark) => self.attendance.upsert(mark),
            None => self.attendance.remove(employee_id, date).map(|_| ()),
        };

        match restored {
            Ok(()) => warn!(
                employee_id = %employee_id,
                date = %date,
                "Recompute failed; attendance mark rolled back"
            ),
            Err(err) => warn!(
                employee_id = %employee_id,
                date = %date,
                error = %err,
                "Recompute failed and the attendance mark could not be rolled back"
            ),
        }
    }

    fn has_month_data(&self, employee_id: &str, period: Period) -> LedgerResult<bool> {
        if self.ledger.read_snapshot(employee_id, period)?.is_some() {
            return Ok(true);
        }
        Ok(!self.attendance.read_month(employee_id, period)?.is_empty())
    }

    fn locked<T>(
        &self,
        employee_id: &str,
        period: Period,
        f: impl FnOnce() -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        self.locks.with_lock(&(employee_id.to_string(), period), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{DayCategory, classify};
    use crate::models::LeaveType;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn engine() -> LedgerEngine {
        LedgerEngine::in_memory(
            [Employee::new("emp_001", "Asha Rao"), Employee::new("emp_002", "Ben Okafor")],
            LeavePolicy::default(),
        )
    }

    /// Working days of the month (ordinary weekdays first, then working Saturdays).
    fn working_dates(year: i32, month: u32) -> Vec<NaiveDate> {
        let period = Period::new(year, month).unwrap();
        let mut dates: Vec<_> = period
            .dates()
            .filter(|d| classify(*d) == DayCategory::OrdinaryWorking)
            .collect();
        dates.extend(
            period
                .dates()
                .filter(|d| classify(*d) == DayCategory::WorkingWeekend),
        );
        dates
    }

    fn mark_present(engine: &LedgerEngine, year: i32, month: u32, days: usize) {
        for d in working_dates(year, month).into_iter().take(days) {
            engine.mark_day("emp_001", d, DayRecord::Present, None).unwrap();
        }
    }

    fn request(status: &str, leave_type: Option<&str>) -> MarkDayRequest {
        MarkDayRequest {
            employee_id: "emp_001".to_string(),
            date: date(2024, 6, 3),
            status: status.to_string(),
            leave_type: leave_type.map(str::to_string),
            remarks: None,
        }
    }

    /// Attendance store whose reads can be switched to fail.
    #[derive(Default)]
    struct FlakyAttendanceStore {
        inner: InMemoryAttendanceStore,
        fail_reads: AtomicBool,
    }

    impl AttendanceStore for FlakyAttendanceStore {
        fn read_month(&self, employee_id: &str, period: Period) -> LedgerResult<Vec<AttendanceMark>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(LedgerError::storage("attendance backend unavailable"));
            }
            self.inner.read_month(employee_id, period)
        }

        fn upsert(&self, mark: AttendanceMark) -> LedgerResult<()> {
            self.inner.upsert(mark)
        }

        fn remove(&self, employee_id: &str, date: NaiveDate) -> LedgerResult<Option<AttendanceMark>> {
            self.inner.remove(employee_id, date)
        }
    }

    // ==========================================================================
    // Recompute
    // ==========================================================================

    #[test]
    fn test_june_2024_twenty_two_present_days() {
        let engine = engine();
        mark_present(&engine, 2024, 6, 22);

        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.total_present_days, 22);
        assert_eq!(snapshot.total_working_days, 23);
        assert_eq!(snapshot.el_carry_forward, Decimal::ZERO);
        assert_eq!(snapshot.el_earned, dec("1.25"));
        assert_eq!(snapshot.el_balance, dec("1.25"));
        assert_eq!(snapshot.el_earn_date, Some(date(2024, 6, 22)));
        assert_eq!(snapshot.cl_balance, Decimal::ONE);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_accrual_boundary_nineteen_versus_twenty() {
        let engine = engine();
        mark_present(&engine, 2024, 6, 19);
        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.el_earned, Decimal::ZERO);
        assert_eq!(snapshot.el_earn_date, None);

        mark_present(&engine, 2024, 6, 20);
        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.total_present_days, 20);
        assert_eq!(snapshot.el_earned, dec("1.25"));
    }

    #[test]
    fn test_work_on_holiday_counts_towards_threshold() {
        let engine = engine();
        mark_present(&engine, 2024, 6, 19);
        engine
            .mark_day("emp_001", date(2024, 6, 2), DayRecord::WorkOnHoliday, None)
            .unwrap();

        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.total_present_days, 20);
        assert_eq!(snapshot.el_earned, dec("1.25"));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let engine = engine();
        mark_present(&engine, 2024, 6, 21);
        engine
            .mark_day("emp_001", date(2024, 6, 28), DayRecord::Leave(LeaveType::El), None)
            .unwrap();

        let first = engine.recompute("emp_001", 2024, 6).unwrap();
        let second = engine.recompute("emp_001", 2024, 6).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_december_balance_carries_into_january() {
        let engine = engine();
        // November and December both reach the threshold.
        mark_present(&engine, 2024, 11, 20);
        mark_present(&engine, 2024, 12, 20);
        let december = engine.get_snapshot("emp_001", 2024, 12).unwrap().unwrap();
        assert_eq!(december.el_balance, dec("2.5"));

        mark_present(&engine, 2025, 1, 5);
        let january = engine.get_snapshot("emp_001", 2025, 1).unwrap().unwrap();
        assert_eq!(january.el_carry_forward, dec("2.5"));
        assert_eq!(january.el_earned, Decimal::ZERO);
        assert_eq!(january.el_balance, dec("2.5"));

        let prior = engine.get_prior_snapshot("emp_001", 2025, 1).unwrap().unwrap();
        assert_eq!(prior.period(), Period::new(2024, 12).unwrap());
    }

    #[test]
    fn test_recompute_does_not_cascade_forward() {
        let engine = engine();
        mark_present(&engine, 2024, 6, 20);
        mark_present(&engine, 2024, 7, 3);
        assert_eq!(
            engine.get_snapshot("emp_001", 2024, 7).unwrap().unwrap().el_carry_forward,
            dec("1.25")
        );

        // Retroactive EL in June lowers June's closing balance...
        engine
            .mark_day("emp_001", date(2024, 6, 29), DayRecord::Leave(LeaveType::El), None)
            .unwrap();
        assert_eq!(
            engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap().el_balance,
            dec("0.25")
        );
        // ...but July still carries the stale value until asked.
        assert_eq!(
            engine.get_snapshot("emp_001", 2024, 7).unwrap().unwrap().el_carry_forward,
            dec("1.25")
        );

        let written = engine.recompute_forward("emp_001", 2024, 6).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1].el_carry_forward, dec("0.25"));
        assert_eq!(written[1].el_balance, dec("0.25"));
    }

    #[test]
    fn test_recompute_forward_stops_at_first_empty_month() {
        let engine = engine();
        mark_present(&engine, 2024, 6, 20);
        mark_present(&engine, 2024, 7, 20);
        // August empty, September has data but is beyond the gap.
        mark_present(&engine, 2024, 9, 1);

        let written = engine.recompute_forward("emp_001", 2024, 6).unwrap();
        let months: Vec<_> = written.iter().map(|s| s.month).collect();
        assert_eq!(months, vec![6, 7]);
    }

    #[test]
    fn test_recompute_unknown_employee_creates_nothing() {
        let engine = engine();
        assert!(matches!(
            engine.recompute("ghost", 2024, 6),
            Err(LedgerError::EmployeeNotFound { .. })
        ));
        assert!(engine.get_snapshot("ghost", 2024, 6).unwrap().is_none());
    }

    // ==========================================================================
    // CL allocation override
    // ==========================================================================

    #[test]
    fn test_cl_override_survives_later_marks() {
        let engine = engine();
        engine.set_cl_allocation("emp_001", 2024, 6, dec("2")).unwrap();
        engine
            .mark_day("emp_001", date(2024, 6, 3), DayRecord::Leave(LeaveType::Cl), None)
            .unwrap();

        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.cl_allocated, dec("2"));
        assert_eq!(snapshot.cl_balance, Decimal::ONE);
    }

    #[test]
    fn test_negative_cl_override_is_rejected() {
        let engine = engine();
        assert!(matches!(
            engine.set_cl_allocation("emp_001", 2024, 6, dec("-1")),
            Err(LedgerError::Validation { .. })
        ));
    }

    // ==========================================================================
    // Marking
    // ==========================================================================

    #[test]
    fn test_invalid_request_writes_nothing() {
        let engine = engine();
        assert!(matches!(
            engine.mark(request("leave", None)),
            Err(LedgerError::Validation { .. })
        ));
        assert!(matches!(
            engine.mark(request("absent", None)),
            Err(LedgerError::Validation { .. })
        ));

        let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
        assert!(summary.attendance.is_empty());
        assert!(engine.get_snapshot("emp_001", 2024, 6).unwrap().is_none());
    }

    #[test]
    fn test_mark_unknown_employee_is_not_found() {
        let engine = engine();
        let mut req = request("present", None);
        req.employee_id = "ghost".to_string();

        assert!(matches!(
            engine.mark(req),
            Err(LedgerError::EmployeeNotFound { .. })
        ));
        assert!(engine.get_snapshot("ghost", 2024, 6).unwrap().is_none());
    }

    #[test]
    fn test_overwrite_replaces_previous_status() {
        let engine = engine();
        engine.mark(request("leave", Some("cl"))).unwrap();
        let snapshot = engine.mark(request("present", Some("cl"))).unwrap();

        assert_eq!(snapshot.cl_used, 0);
        assert_eq!(snapshot.total_present_days, 1);
        let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
        assert_eq!(summary.attendance.len(), 1);
        assert_eq!(summary.attendance[0].record.leave_type(), None);
    }

    #[test]
    fn test_work_on_holiday_credit_earned_then_used() {
        let engine = engine();
        engine
            .mark_day("emp_001", date(2024, 6, 9), DayRecord::WorkOnHoliday, None)
            .unwrap();
        engine
            .mark_day(
                "emp_001",
                date(2024, 6, 12),
                DayRecord::Leave(LeaveType::WorkOnHoliday),
                None,
            )
            .unwrap();

        let stats = engine.get_monthly_summary("emp_001", 2024, 6).unwrap().summary.stats;
        assert_eq!(stats.work_on_holiday_earned, 1);
        assert_eq!(stats.work_on_holiday_used, 1);
        assert_eq!(stats.work_on_holiday_balance, 0);
    }

    #[test]
    fn test_bulk_reports_each_entry() {
        let engine = engine();
        let mut bad = request("leave", None);
        bad.date = date(2024, 6, 4);
        let mut ghost = request("present", None);
        ghost.employee_id = "ghost".to_string();

        let outcomes = engine.mark_bulk(vec![request("present", None), bad, ghost]);
        let flags: Vec<_> = outcomes.iter().map(|o| o.success).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert!(outcomes[1].error.as_deref().unwrap().contains("leave_type"));

        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.total_present_days, 1);
    }

    #[test]
    fn test_delete_mark_recomputes_month() {
        let engine = engine();
        engine.mark(request("leave", Some("el"))).unwrap();
        let snapshot = engine.delete_mark("emp_001", date(2024, 6, 3)).unwrap();

        assert_eq!(snapshot.el_used, 0);
        assert_eq!(snapshot.el_balance, Decimal::ZERO);
        assert!(matches!(
            engine.delete_mark("emp_001", date(2024, 6, 3)),
            Err(LedgerError::MarkNotFound { .. })
        ));
    }

    // ==========================================================================
    // Summary
    // ==========================================================================

    #[test]
    fn test_summary_reflects_marks_regardless_of_order() {
        let engine = engine();
        let days = working_dates(2024, 6);
        let plan = [
            (days[4], DayRecord::Leave(LeaveType::El)),
            (days[0], DayRecord::Leave(LeaveType::Cl)),
            (days[2], DayRecord::Leave(LeaveType::El)),
            (days[1], DayRecord::Present),
        ];
        for (d, record) in plan {
            engine.mark_day("emp_001", d, record, None).unwrap();
        }

        let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
        assert_eq!(summary.summary.stats.cl_taken, 1);
        assert_eq!(summary.summary.stats.el_taken, 2);
        assert_eq!(summary.summary.leave.el_balance, dec("-2"));
        assert_eq!(summary.calendar.len(), 30);
        let dates: Vec<_> = summary.attendance.iter().map(|m| m.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_summary_without_snapshot_uses_policy_defaults() {
        let engine = engine();
        let summary = engine.get_monthly_summary("emp_002", 2024, 6).unwrap();

        assert_eq!(summary.employee.name, "Ben Okafor");
        assert_eq!(summary.summary.leave.cl_allocated, Decimal::ONE);
        assert_eq!(summary.summary.leave.el_carry_forward, Decimal::ZERO);
        assert_eq!(summary.summary.stats.working_days, 23);
    }

    #[test]
    fn test_month_roll_up_covers_active_employees() {
        let engine = engine();
        engine.mark(request("present", None)).unwrap();
        let mut leave = request("leave", Some("cl"));
        leave.date = date(2024, 6, 4);
        engine.mark(leave).unwrap();

        let rows = engine.month_roll_up(2024, 6).unwrap();
        assert_eq!(rows.len(), 2);
        let asha = rows.iter().find(|r| r.employee_id == "emp_001").unwrap();
        assert_eq!(asha.marked_days, 2);
        assert_eq!(asha.present_days, 1);
        assert_eq!(asha.leave_days, 1);
        let ben = rows.iter().find(|r| r.employee_id == "emp_002").unwrap();
        assert_eq!(ben.marked_days, 0);
    }

    // ==========================================================================
    // Failure and concurrency
    // ==========================================================================

    #[test]
    fn test_storage_failure_keeps_previous_snapshot() {
        let attendance = Arc::new(FlakyAttendanceStore::default());
        let engine = LedgerEngine::new(
            Arc::new(InMemoryEmployeeDirectory::new([Employee::new("emp_001", "Asha Rao")])),
            attendance.clone(),
            Arc::new(InMemoryLedgerStore::new()),
            LeavePolicy::default(),
        );
        let before = engine.mark(request("present", None)).unwrap();

        attendance.fail_reads.store(true, Ordering::SeqCst);
        let mut later = request("leave", Some("cl"));
        later.date = date(2024, 6, 4);
        assert!(matches!(engine.mark(later), Err(LedgerError::Storage { .. })));

        attendance.fail_reads.store(false, Ordering::SeqCst);
        let after = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(after, before);
    }

    fn flaky_engine() -> (LedgerEngine, Arc<FlakyAttendanceStore>) {
        let attendance = Arc::new(FlakyAttendanceStore::default());
        let engine = LedgerEngine::new(
            Arc::new(InMemoryEmployeeDirectory::new([Employee::new("emp_001", "Asha Rao")])),
            attendance.clone(),
            Arc::new(InMemoryLedgerStore::new()),
            LeavePolicy::default(),
        );
        (engine, attendance)
    }

    #[test]
    fn test_failed_mark_on_new_day_is_rolled_back() {
        let (engine, attendance) = flaky_engine();
        let before = engine.mark(request("present", None)).unwrap();
        let marks_before = engine.get_monthly_summary("emp_001", 2024, 6).unwrap().attendance;

        attendance.fail_reads.store(true, Ordering::SeqCst);
        let mut later = request("leave", Some("cl"));
        later.date = date(2024, 6, 4);
        assert!(engine.mark(later).is_err());
        attendance.fail_reads.store(false, Ordering::SeqCst);

        let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
        assert_eq!(summary.attendance, marks_before);
        assert_eq!(summary.summary.stats.cl_taken, 0);
        // The stored snapshot is still reproducible from the marks.
        assert_eq!(engine.recompute("emp_001", 2024, 6).unwrap(), before);
    }

    #[test]
    fn test_failed_overwrite_restores_previous_mark() {
        let (engine, attendance) = flaky_engine();
        let mut first = request("leave", Some("el"));
        first.remarks = Some("travel".to_string());
        let before = engine.mark(first).unwrap();
        let marks_before = engine.get_monthly_summary("emp_001", 2024, 6).unwrap().attendance;

        attendance.fail_reads.store(true, Ordering::SeqCst);
        assert!(engine.mark(request("present", None)).is_err());
        attendance.fail_reads.store(false, Ordering::SeqCst);

        let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
        assert_eq!(summary.attendance, marks_before);
        assert_eq!(summary.attendance[0].remarks.as_deref(), Some("travel"));
        assert_eq!(engine.recompute("emp_001", 2024, 6).unwrap(), before);
    }

    #[test]
    fn test_failed_delete_restores_mark() {
        let (engine, attendance) = flaky_engine();
        let before = engine.mark(request("leave", Some("cl"))).unwrap();

        attendance.fail_reads.store(true, Ordering::SeqCst);
        assert!(matches!(
            engine.delete_mark("emp_001", date(2024, 6, 3)),
            Err(LedgerError::Storage { .. })
        ));
        attendance.fail_reads.store(false, Ordering::SeqCst);

        let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
        assert_eq!(summary.attendance.len(), 1);
        assert_eq!(summary.attendance[0].record, DayRecord::Leave(LeaveType::Cl));
        assert_eq!(engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap(), before);
    }

    #[test]
    fn test_concurrent_marks_for_one_month_are_all_counted() {
        let engine = Arc::new(engine());
        let days = working_dates(2024, 6);

        let handles: Vec<_> = days
            .iter()
            .copied()
            .map(|d| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine.mark_day("emp_001", d, DayRecord::Present, None).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = engine.get_snapshot("emp_001", 2024, 6).unwrap().unwrap();
        assert_eq!(snapshot.total_present_days, days.len() as u32);
        assert_eq!(snapshot.el_earned, dec("1.25"));
    }
}
