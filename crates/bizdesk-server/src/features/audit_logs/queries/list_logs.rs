//! List audit logs
//!
//! Filtered view over the whole audit trail, newest first.

use serde::{Deserialize, Serialize};

use crate::audit::{AuditFilter, AuditLog, AuditStore, DEFAULT_AUDIT_QUERY_LIMIT};
use crate::auth::{authorize, Operation, Requester};
use crate::features::audit_logs::AuditQueryError;
use crate::features::shared::validation::{non_blank, resolve_limit, ValidationError};

/// Query parameters for `GET /api/audit/logs`
///
/// Empty `module` or `action` values are treated as absent, as is
/// `user_id=0` (user ids start at 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAuditLogsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ListAuditLogsQuery {
    /// Resolve the row limit against the configured ceiling
    pub fn limit(&self, max_limit: i64) -> Result<i64, ValidationError> {
        resolve_limit(self.limit, DEFAULT_AUDIT_QUERY_LIMIT, max_limit)
    }

    pub fn into_filter(self) -> AuditFilter {
        AuditFilter {
            module: non_blank(self.module),
            user_id: self.user_id.filter(|id| *id != 0),
            action: non_blank(self.action),
        }
    }
}

#[tracing::instrument(
    skip(store, requester, query),
    fields(requester_id = requester.user_id, role = %requester.role)
)]
pub async fn handle(
    store: &dyn AuditStore,
    requester: &Requester,
    query: ListAuditLogsQuery,
    max_limit: i64,
) -> Result<Vec<AuditLog>, AuditQueryError> {
    authorize(Operation::ListAuditLogs, requester.role)?;

    let limit = query.limit(max_limit)?;
    let filter = query.into_filter();

    let logs = store.list(&filter, limit).await?;

    tracing::debug!(count = logs.len(), limit, "Listed audit logs");

    Ok(logs)
}
