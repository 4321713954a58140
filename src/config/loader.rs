//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the leave
//! policy and the optional employee roster from YAML files.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Employee;

use super::types::{LeavePolicy, LedgerConfig, PolicyMetadata};

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    employees: Vec<Employee>,
}

/// Loads and provides access to the ledger configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml     # Policy metadata and leave accrual rules
/// └── employees.yaml  # Optional roster seeding the employee directory
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("EL threshold: {} days", loader.leave_policy().el_accrual_threshold_days);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: LedgerConfig,
    employees: Vec<Employee>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `policy.yaml` is missing or is not valid YAML,
    /// or if the policy values are unusable (negative amounts, zero threshold).
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let policy_path = path.as_ref().join("policy.yaml");
        let config = Self::load_yaml::<LedgerConfig>(&policy_path)?;
        Self::validate(&config, &policy_path)?;

        let roster_path = path.as_ref().join("employees.yaml");
        let employees = if roster_path.exists() {
            let roster = Self::load_yaml::<RosterFile>(&roster_path)?;
            Self::validate_roster(&roster.employees, &roster_path)?;
            roster.employees
        } else {
            Vec::new()
        };

        Ok(Self { config, employees })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &LedgerConfig, path: &Path) -> LedgerResult<()> {
        let leave = config.leave();
        let problem = if leave.cl_allocated_per_month.is_sign_negative() {
            Some("cl_allocated_per_month must not be negative")
        } else if leave.el_accrual_per_month.is_sign_negative() {
            Some("el_accrual_per_month must not be negative")
        } else if leave.el_accrual_threshold_days == 0 || leave.el_accrual_threshold_days > 31 {
            Some("el_accrual_threshold_days must be between 1 and 31")
        } else {
            None
        };

        match problem {
            Some(message) => Err(LedgerError::ConfigParseError {
                path: path.display().to_string(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn validate_roster(employees: &[Employee], path: &Path) -> LedgerResult<()> {
        let mut seen = std::collections::HashSet::new();
        for employee in employees {
            let message = if employee.id.trim().is_empty() {
                "employee id must not be empty".to_string()
            } else if !seen.insert(employee.id.as_str()) {
                format!("duplicate employee id '{}'", employee.id)
            } else {
                continue;
            };
            return Err(LedgerError::ConfigParseError {
                path: path.display().to_string(),
                message,
            });
        }
        Ok(())
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        self.config.metadata()
    }

    /// Returns the leave accrual rules.
    pub fn leave_policy(&self) -> &LeavePolicy {
        self.config.leave()
    }

    /// Returns the roster from `employees.yaml`, empty if the file is absent.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }
}
