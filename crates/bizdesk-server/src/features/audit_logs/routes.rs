//! Audit log API routes
//!
//! # Route Structure
//!
//! - `GET /api/audit/logs` - List entries, filtered by `module`, `user_id`, `action`, `limit`
//! - `GET /api/audit/logs/record/:module/:record_id` - Full history of one record
//! - `GET /api/audit/stats` - Totals and breakdowns (admin only)
//!
//! Every route requires an authenticated [`Requester`]; the role check runs
//! before any store access.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use super::queries::{self, ListAuditLogsQuery};
use crate::audit::{AuditLog, AuditStats};
use crate::api::extract::{ApiPath, ApiQuery};
use crate::auth::Requester;
use crate::error::AppResult;
use crate::features::FeatureState;

pub fn audit_routes() -> Router<FeatureState> {
    Router::new()
        .route("/logs", get(list_logs))
        .route("/logs/record/:module/:record_id", get(record_history))
        .route("/stats", get(audit_stats))
}

/// `GET /api/audit/logs?module=customers&user_id=3&action=UPDATE&limit=50`
///
/// # Response
///
/// - `200 OK` - Entries, newest first
/// - `400 Bad Request` - `limit` below 1
/// - `403 Forbidden` - Role other than ADMIN or RECEPTION
#[tracing::instrument(skip(state, requester), fields(requester_id = requester.user_id))]
async fn list_logs(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiQuery(query): ApiQuery<ListAuditLogsQuery>,
) -> AppResult<Json<Vec<AuditLog>>> {
    let logs = queries::list_logs::handle(
        state.audit.as_ref(),
        &requester,
        query,
        state.audit_config.max_query_limit,
    )
    .await?;

    Ok(Json(logs))
}

/// `GET /api/audit/logs/record/:module/:record_id`
///
/// An unknown record yields an empty list, not 404.
#[tracing::instrument(skip(state, requester), fields(requester_id = requester.user_id))]
async fn record_history(
    State(state): State<FeatureState>,
    requester: Requester,
    ApiPath((module, record_id)): ApiPath<(String, String)>,
) -> AppResult<Json<Vec<AuditLog>>> {
    let history =
        queries::record_history::handle(state.audit.as_ref(), &requester, &module, &record_id)
            .await?;

    Ok(Json(history))
}

/// `GET /api/audit/stats`
///
/// # Response
///
/// ```json
/// {
///   "total_logs": 5,
///   "actions": [{ "action": "UPDATE", "count": 3 }, { "action": "CREATE", "count": 2 }],
///   "modules": [{ "module": "customers", "count": 5 }],
///   "top_users": [{ "username": "asha", "count": 5 }]
/// }
/// ```
#[tracing::instrument(skip(state, requester), fields(requester_id = requester.user_id))]
async fn audit_stats(
    State(state): State<FeatureState>,
    requester: Requester,
) -> AppResult<Json<AuditStats>> {
    let stats = queries::stats::handle(state.audit.as_ref(), &requester).await?;

    Ok(Json(stats))
}
