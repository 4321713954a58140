//! HTTP request handlers for the leave ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::models::MarkDayRequest;

use super::request::{BulkMarkRequest, ClAllocationRequest};
use super::response::{ApiError, ApiErrorResponse, BulkMarkResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
///
/// Writes go through [`AppState::run_blocking`] because the engine takes
/// std locks and may walk several months. Reads are a handful of map
/// lookups and run inline.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/attendance", post(mark_handler))
        .route("/attendance/bulk", post(bulk_mark_handler))
        .route("/attendance/:employee_id/:date", delete(delete_mark_handler))
        .route(
            "/attendance/monthly/:employee_id/:year/:month",
            get(monthly_summary_handler),
        )
        .route(
            "/attendance/employees-summary/:year/:month",
            get(employees_summary_handler),
        )
        .route("/ledger/:employee_id/:year/:month", get(snapshot_handler))
        .route(
            "/ledger/:employee_id/:year/:month/recompute-forward",
            post(recompute_forward_handler),
        )
        .route(
            "/ledger/:employee_id/:year/:month/cl-allocation",
            put(cl_allocation_handler),
        )
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    json_ok(json!({
        "status": "ok",
        "policy": state.policy(),
        "leave": state.engine().policy(),
    }))
}

/// Handler for POST /attendance.
///
/// Marks one day and returns the recomputed snapshot for its month.
async fn mark_handler(
    State(state): State<AppState>,
    payload: Result<Json<MarkDayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing mark request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    let employee_id = request.employee_id.clone();
    let date = request.date;
    let start_time = Instant::now();
    let result = state.run_blocking(move |engine| engine.mark(request)).await;
    if result.is_ok() {
        info!(
            correlation_id = %correlation_id,
            employee_id = %employee_id,
            date = %date,
            duration_us = start_time.elapsed().as_micros(),
            "Attendance mark applied"
        );
    }
    respond(correlation_id, "mark", result)
}

/// Handler for POST /attendance/bulk.
///
/// Applies each record independently; a failing record does not fail the
/// request.
async fn bulk_mark_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkMarkRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing bulk mark request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    if request.records.is_empty() {
        warn!(correlation_id = %correlation_id, "Bulk mark request has no records");
        return ApiErrorResponse::bad_request(ApiError::validation_error(
            "records must not be empty",
        ))
        .into_response();
    }

    let records = request.records;
    let outcomes = match state
        .run_blocking(move |engine| Ok(engine.mark_bulk(records)))
        .await
    {
        Ok(outcomes) => outcomes,
        Err(err) => return respond::<()>(correlation_id, "mark_bulk", Err(err)),
    };
    let response = BulkMarkResponse::from(outcomes);
    info!(
        correlation_id = %correlation_id,
        succeeded = response.succeeded,
        failed = response.failed,
        "Bulk mark completed"
    );
    json_ok(response)
}

/// Handler for DELETE /attendance/{employee_id}/{date}.
async fn delete_mark_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        date = %date,
        "Processing delete mark request"
    );

    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return err.into_response(),
    };
    let result = state
        .run_blocking(move |engine| engine.delete_mark(&employee_id, date))
        .await;
    respond(correlation_id, "delete_mark", result)
}

/// Handler for GET /attendance/monthly/{employee_id}/{year}/{month}.
async fn monthly_summary_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(String, String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (year, month) = match parse_period(&year, &month) {
        Ok(period) => period,
        Err(err) => return err.into_response(),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        year,
        month,
        "Processing monthly summary request"
    );

    respond(
        correlation_id,
        "monthly_summary",
        state.engine().get_monthly_summary(&employee_id, year, month),
    )
}

/// Handler for GET /attendance/employees-summary/{year}/{month}.
async fn employees_summary_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (year, month) = match parse_period(&year, &month) {
        Ok(period) => period,
        Err(err) => return err.into_response(),
    };
    info!(correlation_id = %correlation_id, year, month, "Processing employees summary request");

    respond(
        correlation_id,
        "employees_summary",
        state.engine().month_roll_up(year, month),
    )
}

/// Handler for GET /ledger/{employee_id}/{year}/{month}.
async fn snapshot_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(String, String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (year, month) = match parse_period(&year, &month) {
        Ok(period) => period,
        Err(err) => return err.into_response(),
    };

    match state.engine().get_snapshot(&employee_id, year, month) {
        Ok(Some(snapshot)) => json_ok(snapshot),
        Ok(None) => ApiErrorResponse::not_found(ApiError::new(
            "SNAPSHOT_NOT_FOUND",
            format!(
                "No ledger snapshot for employee '{}' in {}-{:02}",
                employee_id, year, month
            ),
        ))
        .into_response(),
        Err(err) => respond::<()>(correlation_id, "snapshot", Err(err)),
    }
}

/// Handler for POST /ledger/{employee_id}/{year}/{month}/recompute-forward.
///
/// Recomputes the month and every following month that has data.
async fn recompute_forward_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(String, String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (year, month) = match parse_period(&year, &month) {
        Ok(period) => period,
        Err(err) => return err.into_response(),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        year,
        month,
        "Processing forward recompute request"
    );

    let result = state
        .run_blocking(move |engine| engine.recompute_forward(&employee_id, year, month))
        .await;
    respond(correlation_id, "recompute_forward", result)
}

/// Handler for PUT /ledger/{employee_id}/{year}/{month}/cl-allocation.
async fn cl_allocation_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(String, String, String)>,
    payload: Result<Json<ClAllocationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (year, month) = match parse_period(&year, &month) {
        Ok(period) => period,
        Err(err) => return err.into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        year,
        month,
        cl_allocated = %request.cl_allocated,
        "Processing CL allocation override"
    );

    let result = state
        .run_blocking(move |engine| {
            engine.set_cl_allocation(&employee_id, year, month, request.cl_allocated)
        })
        .await;
    respond(correlation_id, "cl_allocation", result)
}

// ============================================================================
// Helpers
// ============================================================================

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Turns an engine result into a response, logging failures.
fn respond<T: Serialize>(correlation_id: Uuid, operation: &str, result: LedgerResult<T>) -> Response {
    match result {
        Ok(body) => json_ok(body),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::malformed_json("Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn parse_period(year: &str, month: &str) -> Result<(i32, u32), ApiErrorResponse> {
    match (year.parse::<i32>(), month.parse::<u32>()) {
        (Ok(year), Ok(month)) => Ok((year, month)),
        _ => Err(ApiErrorResponse::bad_request(ApiError::invalid_period(
            format!("Invalid period: {}-{}", year, month),
        ))),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiErrorResponse> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiErrorResponse::bad_request(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("Invalid field 'date': '{}' is not a date", raw),
            "Dates use the YYYY-MM-DD format",
        ))
    })
}
