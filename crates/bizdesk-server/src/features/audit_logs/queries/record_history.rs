//! Record history
//!
//! The complete change history of one entity, matched exactly on module and
//! record id.

use crate::audit::{AuditLog, AuditStore};
use crate::auth::{authorize, Operation, Requester};
use crate::features::audit_logs::AuditQueryError;

#[tracing::instrument(
    skip(store, requester),
    fields(requester_id = requester.user_id, role = %requester.role)
)]
pub async fn handle(
    store: &dyn AuditStore,
    requester: &Requester,
    module: &str,
    record_id: &str,
) -> Result<Vec<AuditLog>, AuditQueryError> {
    authorize(Operation::ViewRecordHistory, requester.role)?;

    let history = store.history(module, record_id).await?;

    tracing::debug!(count = history.len(), "Retrieved record history");

    Ok(history)
}
