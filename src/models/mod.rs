//! Core data models for the leave ledger.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod period;
mod snapshot;

pub use attendance::{AttendanceMark, AttendanceStatus, DayRecord, LeaveType, MarkDayRequest};
pub use employee::{Employee, EmploymentStatus};
pub use period::Period;
pub use snapshot::LeaveLedgerSnapshot;
