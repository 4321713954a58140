//! Employee model.
//!
//! Employees are owned by the HR records system; the ledger only reads them
//! to confirm an id exists and to label summaries.

use serde::{Deserialize, Serialize};

/// Whether the employee is currently on the books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed; included in month roll-ups.
    #[default]
    Active,
    /// Left or suspended; still addressable by id.
    Inactive,
}

/// Represents an employee whose attendance is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title, if recorded.
    #[serde(default)]
    pub designation: Option<String>,
    /// Department, if recorded.
    #[serde(default)]
    pub department: Option<String>,
    /// Employment status.
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl Employee {
    /// Creates an active employee with no designation or department.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_ledger::models::Employee;
    ///
    /// let employee = Employee::new("emp_001", "Asha Rao");
    /// assert!(employee.is_active());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            designation: None,
            department: None,
            status: EmploymentStatus::Active,
        }
    }

    /// Returns true if the employee is active.
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_employee_defaults_to_active() {
        let json = r#"{
            "id": "emp_001",
            "name": "Asha Rao"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.status, EmploymentStatus::Active);
        assert!(employee.designation.is_none());
        assert!(employee.is_active());
    }

    #[test]
    fn test_deserialize_inactive_employee() {
        let json = r#"{
            "id": "emp_002",
            "name": "Ben Okafor",
            "designation": "Accountant",
            "department": "Finance",
            "status": "inactive"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.department.as_deref(), Some("Finance"));
        assert!(!employee.is_active());
    }
}
