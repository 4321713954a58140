//! Request bodies for the leave ledger API.
//!
//! Single marks use [`MarkDayRequest`](crate::models::MarkDayRequest)
//! directly; the types here wrap it or cover the ledger endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MarkDayRequest;

/// Request body for `POST /attendance/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMarkRequest {
    /// The marks to apply, each independently.
    pub records: Vec<MarkDayRequest>,
}

/// Request body for `PUT /ledger/{employee_id}/{year}/{month}/cl-allocation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClAllocationRequest {
    /// CL days available in the month.
    pub cl_allocated: Decimal,
}
