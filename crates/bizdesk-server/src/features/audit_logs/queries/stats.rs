//! Audit statistics (admin only)

use crate::audit::{AuditStats, AuditStore};
use crate::auth::{authorize, Operation, Requester};
use crate::features::audit_logs::AuditQueryError;

#[tracing::instrument(
    skip(store, requester),
    fields(requester_id = requester.user_id, role = %requester.role)
)]
pub async fn handle(
    store: &dyn AuditStore,
    requester: &Requester,
) -> Result<AuditStats, AuditQueryError> {
    authorize(Operation::ViewAuditStats, requester.role)?;

    let stats = store.stats().await?;

    tracing::debug!(
        total_logs = stats.total_logs,
        actions = stats.actions.len(),
        modules = stats.modules.len(),
        "Computed audit statistics"
    );

    Ok(stats)
}
