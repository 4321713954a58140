//! Application state for the leave ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tracing::error;

use crate::config::PolicyMetadata;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::LedgerEngine;

/// Shared application state.
///
/// Holds the ledger engine and the metadata of the policy it was built with.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<LedgerEngine>,
    policy: Arc<PolicyMetadata>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: LedgerEngine, policy: PolicyMetadata) -> Self {
        Self {
            engine: Arc::new(engine),
            policy: Arc::new(policy),
        }
    }

    /// Returns the ledger engine.
    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    /// Returns the metadata of the loaded leave policy.
    pub fn policy(&self) -> &PolicyMetadata {
        &self.policy
    }

    /// Runs a ledger write on the blocking pool.
    ///
    /// Writes hold a per-month lock and may recompute several months, so
    /// they stay off the async worker threads.
    pub async fn run_blocking<T, F>(&self, operation: F) -> LedgerResult<T>
    where
        F: FnOnce(&LedgerEngine) -> LedgerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || operation(&engine))
            .await
            .unwrap_or_else(|err| {
                error!(error = %err, "Ledger task did not complete");
                Err(LedgerError::storage(format!("ledger task failed: {}", err)))
            })
    }
}
