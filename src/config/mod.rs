//! Configuration loading and management for the leave ledger.
//!
//! The leave policy (CL allocation, EL accrual amount and threshold) is
//! loaded from a YAML file; server runtime settings come from the
//! environment.
//!
//! # Example
//!
//! ```no_run
//! use leave_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded policy: {}", config.metadata().name);
//! ```

mod loader;
mod server;
mod types;

pub use loader::ConfigLoader;
pub use server::ServerSettings;
pub use types::{
    DEFAULT_CL_ALLOCATED_PER_MONTH, DEFAULT_EL_ACCRUAL_PER_MONTH,
    DEFAULT_EL_ACCRUAL_THRESHOLD_DAYS, LeavePolicy, LedgerConfig, PolicyMetadata,
};
