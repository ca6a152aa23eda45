//! Feature modules implementing the Bizdesk API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes. Handlers call the slice's `handle` functions directly with the
//! store handles they need and the authenticated [`crate::auth::Requester`].
//!
//! # Features
//!
//! - **audit_logs**: Role-gated reads over the audit trail
//! - **attendance**: Biometric + GPS verified check-in/out
//!
//! # Architecture
//!
//! - `commands/` - Write operations, each followed by an audit entry
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared types (if needed)

pub mod attendance;
pub mod audit_logs;
pub mod shared;

use axum::Router;
use std::sync::Arc;

use crate::audit::AuditStore;
use crate::config::AuditConfig;
use attendance::AttendanceStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub audit: Arc<dyn AuditStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub audit_config: AuditConfig,
}

/// Creates the API router with all feature routes mounted
///
/// - `/audit` - Audit trail queries
/// - `/attendance/verified` - Verified attendance
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/audit", audit_logs::audit_routes())
        .nest("/attendance/verified", attendance::attendance_routes())
        .with_state(state)
}
