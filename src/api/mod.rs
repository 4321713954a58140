//! HTTP API module for the leave ledger.
//!
//! This module provides the REST endpoints for marking attendance, reading
//! monthly summaries and maintaining leave ledger snapshots.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BulkMarkRequest, ClAllocationRequest};
pub use response::{ApiError, ApiErrorResponse, BulkMarkResponse};
pub use state::AppState;
