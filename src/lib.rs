//! Attendance and leave ledger engine.
//!
//! This crate classifies calendar days, aggregates daily attendance marks
//! into monthly statistics, and maintains a per-employee, per-month leave
//! ledger with Casual Leave allocation and carry-forward Earned Leave.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use leave_ledger::config::LeavePolicy;
//! use leave_ledger::ledger::LedgerEngine;
//! use leave_ledger::models::{DayRecord, Employee};
//!
//! let engine = LedgerEngine::in_memory([Employee::new("emp_001", "Asha Rao")], LeavePolicy::default());
//! let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
//! engine.mark_day("emp_001", date, DayRecord::Present, None).unwrap();
//!
//! let summary = engine.get_monthly_summary("emp_001", 2024, 6).unwrap();
//! assert_eq!(summary.summary.stats.present_days, 1);
//! assert_eq!(summary.summary.stats.working_days, 23);
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;
pub mod telemetry;
