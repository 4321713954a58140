//! Configuration types for the leave ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML policy file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Casual Leave granted at the start of every month.
pub const DEFAULT_CL_ALLOCATED_PER_MONTH: Decimal = Decimal::ONE;

/// Earned Leave credited in a month that meets the attendance threshold (1.25 days).
pub const DEFAULT_EL_ACCRUAL_PER_MONTH: Decimal = Decimal::from_parts(125, 0, 0, false, 2);

/// Present-equivalent days needed in a month before EL is credited.
pub const DEFAULT_EL_ACCRUAL_THRESHOLD_DAYS: u32 = 20;

/// Metadata identifying the loaded policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Human-readable policy name.
    pub name: String,
    /// The version or effective date of the policy.
    pub version: String,
}

impl Default for PolicyMetadata {
    fn default() -> Self {
        Self {
            name: "Standard Leave Policy".to_string(),
            version: "builtin".to_string(),
        }
    }
}

/// Leave accrual rules.
///
/// The defaults are the organisation-wide constants: 1 CL per month and
/// 1.25 EL per month once 20 present-equivalent days are reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePolicy {
    /// CL allocated to a month that has no override on its snapshot.
    #[serde(default = "default_cl_allocated")]
    pub cl_allocated_per_month: Decimal,
    /// EL credited when the threshold is met.
    #[serde(default = "default_el_accrual")]
    pub el_accrual_per_month: Decimal,
    /// Minimum present-equivalent days for EL to accrue.
    #[serde(default = "default_el_threshold")]
    pub el_accrual_threshold_days: u32,
}

fn default_cl_allocated() -> Decimal {
    DEFAULT_CL_ALLOCATED_PER_MONTH
}

fn default_el_accrual() -> Decimal {
    DEFAULT_EL_ACCRUAL_PER_MONTH
}

fn default_el_threshold() -> u32 {
    DEFAULT_EL_ACCRUAL_THRESHOLD_DAYS
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            cl_allocated_per_month: DEFAULT_CL_ALLOCATED_PER_MONTH,
            el_accrual_per_month: DEFAULT_EL_ACCRUAL_PER_MONTH,
            el_accrual_threshold_days: DEFAULT_EL_ACCRUAL_THRESHOLD_DAYS,
        }
    }
}

/// Policy file structure (`policy.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Policy metadata.
    #[serde(default)]
    pub policy: PolicyMetadata,
    /// Leave accrual rules.
    #[serde(default)]
    pub leave: LeavePolicy,
}

impl LedgerConfig {
    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.policy
    }

    /// Returns the leave accrual rules.
    pub fn leave(&self) -> &LeavePolicy {
        &self.leave
    }
}
