//! Daily attendance marks.
//!
//! A mark records what happened on one day for one employee. The status and
//! the leave sub-type are a single tagged value ([`DayRecord`]) so a leave
//! type can only exist on a leave day. On the wire they are still two flat
//! fields, `status` and `leave_type`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// The kind of leave taken on a leave day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Casual Leave.
    Cl,
    /// Earned Leave.
    El,
    /// Redeems a credit earned by working on a holiday.
    WorkOnHoliday,
}

impl LeaveType {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Cl => "cl",
            LeaveType::El => "el",
            LeaveType::WorkOnHoliday => "work_on_holiday",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cl" => Ok(LeaveType::Cl),
            "el" => Ok(LeaveType::El),
            "work_on_holiday" => Ok(LeaveType::WorkOnHoliday),
            other => Err(LedgerError::validation(
                "leave_type",
                format!("'{}' is not one of cl, el, work_on_holiday", other),
            )),
        }
    }
}

/// The flat status field as it appears in requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked an ordinary day.
    Present,
    /// Off on a holiday.
    Holiday,
    /// On leave.
    Leave,
    /// Worked on a holiday, earning a credit.
    WorkOnHoliday,
}

impl AttendanceStatus {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Holiday => "holiday",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::WorkOnHoliday => "work_on_holiday",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "present" => Ok(AttendanceStatus::Present),
            "holiday" => Ok(AttendanceStatus::Holiday),
            "leave" => Ok(AttendanceStatus::Leave),
            "work_on_holiday" => Ok(AttendanceStatus::WorkOnHoliday),
            other => Err(LedgerError::validation(
                "status",
                format!(
                    "'{}' is not one of present, holiday, leave, work_on_holiday",
                    other
                ),
            )),
        }
    }
}

/// What happened on a day.
///
/// # Example
///
/// ```
/// use leave_ledger::models::{AttendanceStatus, DayRecord, LeaveType};
///
/// let record = DayRecord::parse("leave", Some("el")).unwrap();
/// assert_eq!(record, DayRecord::Leave(LeaveType::El));
/// assert_eq!(record.status(), AttendanceStatus::Leave);
///
/// // A leave type on a non-leave day is dropped.
/// let record = DayRecord::parse("present", Some("cl")).unwrap();
/// assert_eq!(record.leave_type(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayRecord {
    /// Worked an ordinary day.
    Present,
    /// Off on a holiday.
    Holiday,
    /// Worked on a holiday.
    WorkOnHoliday,
    /// On leave of the given type.
    Leave(LeaveType),
}

impl DayRecord {
    /// Builds a record from the flat status and optional leave type.
    ///
    /// A leave status requires a valid leave type. Any other status ignores
    /// the leave type entirely, even one that would not parse.
    pub fn parse(status: &str, leave_type: Option<&str>) -> LedgerResult<Self> {
        let status: AttendanceStatus = status.parse()?;
        match status {
            AttendanceStatus::Leave => {
                let leave_type = leave_type
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| {
                        LedgerError::validation("leave_type", "required when status is leave")
                    })?;
                Ok(DayRecord::Leave(leave_type.parse()?))
            }
            other => Self::from_status(other, None),
        }
    }

    /// Builds a record from already-typed parts.
    ///
    /// Fails only when `status` is leave and `leave_type` is missing.
    pub fn from_status(
        status: AttendanceStatus,
        leave_type: Option<LeaveType>,
    ) -> LedgerResult<Self> {
        match status {
            AttendanceStatus::Present => Ok(DayRecord::Present),
            AttendanceStatus::Holiday => Ok(DayRecord::Holiday),
            AttendanceStatus::WorkOnHoliday => Ok(DayRecord::WorkOnHoliday),
            AttendanceStatus::Leave => leave_type.map(DayRecord::Leave).ok_or_else(|| {
                LedgerError::validation("leave_type", "required when status is leave")
            }),
        }
    }

    /// The flat status.
    pub fn status(&self) -> AttendanceStatus {
        match self {
            DayRecord::Present => AttendanceStatus::Present,
            DayRecord::Holiday => AttendanceStatus::Holiday,
            DayRecord::WorkOnHoliday => AttendanceStatus::WorkOnHoliday,
            DayRecord::Leave(_) => AttendanceStatus::Leave,
        }
    }

    /// The leave type, only ever present on a leave day.
    pub fn leave_type(&self) -> Option<LeaveType> {
        match self {
            DayRecord::Leave(leave_type) => Some(*leave_type),
            _ => None,
        }
    }

    /// Returns true if the day counts towards present days.
    pub fn is_present_equivalent(&self) -> bool {
        matches!(self, DayRecord::Present | DayRecord::WorkOnHoliday)
    }
}

/// One attendance mark, keyed by (employee_id, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MarkRecord", try_from = "MarkRecord")]
pub struct AttendanceMark {
    /// The employee the mark belongs to.
    pub employee_id: String,
    /// The marked day.
    pub date: NaiveDate,
    /// What happened on the day.
    pub record: DayRecord,
    /// Free-text note from whoever marked the day.
    pub remarks: Option<String>,
}

impl AttendanceMark {
    /// Creates a mark without remarks.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, record: DayRecord) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            record,
            remarks: None,
        }
    }
}

/// Flat serialized form of [`AttendanceMark`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MarkRecord {
    employee_id: String,
    date: NaiveDate,
    status: AttendanceStatus,
    leave_type: Option<LeaveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remarks: Option<String>,
}

impl From<AttendanceMark> for MarkRecord {
    fn from(mark: AttendanceMark) -> Self {
        MarkRecord {
            employee_id: mark.employee_id,
            date: mark.date,
            status: mark.record.status(),
            leave_type: mark.record.leave_type(),
            remarks: mark.remarks,
        }
    }
}

impl TryFrom<MarkRecord> for AttendanceMark {
    type Error = LedgerError;

    fn try_from(raw: MarkRecord) -> Result<Self, Self::Error> {
        Ok(AttendanceMark {
            employee_id: raw.employee_id,
            date: raw.date,
            record: DayRecord::from_status(raw.status, raw.leave_type)?,
            remarks: raw.remarks,
        })
    }
}

/// An unvalidated request to mark one day, as received from callers.
///
/// `status` and `leave_type` stay strings here so that an unknown value is
/// reported as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDayRequest {
    /// The employee to mark.
    pub employee_id: String,
    /// The day to mark.
    pub date: NaiveDate,
    /// One of present, holiday, leave, work_on_holiday.
    pub status: String,
    /// One of cl, el, work_on_holiday; only read when status is leave.
    #[serde(default)]
    pub leave_type: Option<String>,
    /// Optional note.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl MarkDayRequest {
    /// Validates the request into a typed mark.
    pub fn into_mark(self) -> LedgerResult<AttendanceMark> {
        if self.employee_id.trim().is_empty() {
            return Err(LedgerError::validation("employee_id", "must not be empty"));
        }
        let record = DayRecord::parse(&self.status, self.leave_type.as_deref())?;
        Ok(AttendanceMark {
            employee_id: self.employee_id,
            date: self.date,
            record,
            remarks: self.remarks.filter(|r| !r.trim().is_empty()),
        })
    }
}
