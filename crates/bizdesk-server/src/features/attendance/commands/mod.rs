//! Attendance commands (write operations)
//!
//! Each successful command appends exactly one audit entry.

pub mod check_in;
pub mod check_out;
pub mod correct;

pub use check_in::CheckInCommand;
pub use check_out::CheckOutCommand;
pub use correct::CorrectAttendanceCommand;

use crate::audit::{self, AuditAction, AuditStore, NewAuditEntry};
use crate::auth::Requester;

use super::types::{ATTENDANCE_MODULE, ATTENDANCE_RECORD_TYPE};

/// Audit a committed attendance mutation. Failures are logged, never returned.
async fn record_audit(
    audit: &dyn AuditStore,
    requester: &Requester,
    action: AuditAction,
    attendance_id: i64,
    changes: serde_json::Value,
) {
    let entry = NewAuditEntry::builder()
        .actor(requester.user_id, &requester.username)
        .action(action.as_str())
        .module(ATTENDANCE_MODULE)
        .record(ATTENDANCE_RECORD_TYPE, attendance_id)
        .changes_json(&changes)
        .ip_address(requester.ip_address.clone())
        .try_build();

    match entry {
        Ok(entry) => {
            audit::record_entry(audit, entry).await;
        },
        Err(reason) => {
            tracing::error!(reason, attendance_id, "Skipping malformed audit entry");
        },
    }
}
