//! Audit trail
//!
//! Every mutating command appends an immutable [`AuditLog`] entry describing
//! who changed which record. Entries are read back through the audit log
//! feature routes (`/api/audit/...`); nothing ever updates or deletes them.
//!
//! # Example: recording a change
//!
//! ```rust,ignore
//! use bizdesk_server::audit::{self, NewAuditEntry};
//!
//! let entry = NewAuditEntry::builder()
//!     .actor(requester.user_id, &requester.username)
//!     .action("UPDATE")
//!     .module("customers")
//!     .record("customer", 42)
//!     .changes(r#"{"phone":"+91 98400 00000"}"#)
//!     .try_build()?;
//!
//! audit::record_entry(store.as_ref(), entry).await;
//! ```

mod models;
mod store;

pub use models::{
    ActionCount, AuditAction, AuditEntryBuilder, AuditFilter, AuditLog, AuditStats, ModuleCount,
    NewAuditEntry, UserCount, DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT, TOP_USERS_LIMIT,
};
pub use store::{AuditStore, PgAuditStore};

use tracing::{error, info};

/// Append `entry` after a committed mutation.
///
/// The mutation has already succeeded, so a failed write is logged and
/// swallowed rather than turned into a request error.
pub async fn record_entry(store: &dyn AuditStore, entry: NewAuditEntry) -> Option<AuditLog> {
    let module = entry.module.clone();
    let record_id = entry.record_id.clone();

    match store.insert(entry).await {
        Ok(log) => {
            info!(
                audit_id = log.id,
                action = %log.action,
                module = %log.module,
                record_id = %log.record_id,
                "Audit log entry created"
            );
            Some(log)
        },
        Err(e) => {
            error!(
                error = %e,
                module = %module,
                record_id = %record_id,
                "Failed to create audit log entry"
            );
            None
        },
    }
}
