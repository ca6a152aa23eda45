//! Verified attendance API routes
//!
//! # Route Structure
//!
//! - `POST /api/attendance/verified/check-in` - Open a record for the requester
//! - `PUT /api/attendance/verified/:id/check-out` - Close the requester's open record
//! - `GET /api/attendance/verified/:id` - One record (owner, ADMIN, RECEPTION)
//! - `GET /api/attendance/verified` - List, scoped by role
//! - `PUT /api/attendance/verified/:id/correct` - Change verification status (ADMIN)

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use super::{
    commands::{self, CheckInCommand, CheckOutCommand, CorrectAttendanceCommand},
    queries::{self, ListAttendanceQuery},
    VerifiedAttendance,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::auth::Requester;
use crate::error::AppResult;
use crate::features::FeatureState;

pub fn attendance_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_attendance))
        .route("/check-in", post(check_in))
        .route("/:id", get(get_attendance))
        .route("/:id/check-out", put(check_out))
        .route("/:id/correct", put(correct_attendance))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /api/attendance/verified/check-in`
///
/// # Response
///
/// - `201 Created` - The new record
/// - `400 Bad Request` - Confidence or coordinates out of range
/// - `409 Conflict` - The requester is already checked in
#[tracing::instrument(skip(state, requester, command), fields(employee_id = requester.user_id))]
async fn check_in(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiJson(command): ApiJson<CheckInCommand>,
) -> AppResult<(StatusCode, Json<VerifiedAttendance>)> {
    let record = commands::check_in::handle(
        state.attendance.as_ref(),
        state.audit.as_ref(),
        &requester,
        command,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/attendance/verified/:id/check-out`
///
/// # Response
///
/// - `200 OK` - The closed record
/// - `403 Forbidden` - Record belongs to another employee
/// - `404 Not Found` - Unknown id
/// - `409 Conflict` - Already checked out
#[tracing::instrument(skip(state, requester, command), fields(employee_id = requester.user_id))]
async fn check_out(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiPath(id): ApiPath<i64>,
    ApiJson(command): ApiJson<CheckOutCommand>,
) -> AppResult<Json<VerifiedAttendance>> {
    let record = commands::check_out::handle(
        state.attendance.as_ref(),
        state.audit.as_ref(),
        &requester,
        id,
        command,
    )
    .await?;

    Ok(Json(record))
}

/// `PUT /api/attendance/verified/:id/correct`
///
/// ```json
/// { "status": "FAILED", "reason": "Face does not match employee photo" }
/// ```
#[tracing::instrument(skip(state, requester, command), fields(requester_id = requester.user_id))]
async fn correct_attendance(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiPath(id): ApiPath<i64>,
    ApiJson(command): ApiJson<CorrectAttendanceCommand>,
) -> AppResult<Json<VerifiedAttendance>> {
    let record = commands::correct::handle(
        state.attendance.as_ref(),
        state.audit.as_ref(),
        &requester,
        id,
        command,
    )
    .await?;

    Ok(Json(record))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state, requester), fields(requester_id = requester.user_id))]
async fn get_attendance(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<VerifiedAttendance>> {
    let record = queries::get::handle(state.attendance.as_ref(), &requester, id).await?;

    Ok(Json(record))
}

/// `GET /api/attendance/verified?employee_id=7&date=2026-03-14&status=PENDING&limit=50`
#[tracing::instrument(skip(state, requester), fields(requester_id = requester.user_id))]
async fn list_attendance(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiQuery(query): ApiQuery<ListAttendanceQuery>,
) -> AppResult<Json<Vec<VerifiedAttendance>>> {
    let records = queries::list::handle(state.attendance.as_ref(), &requester, query).await?;

    Ok(Json(records))
}
