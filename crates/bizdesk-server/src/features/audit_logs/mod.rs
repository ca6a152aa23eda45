//! Audit trail read API
//!
//! Three role-gated queries over the append-only audit log. Entries are
//! written by [`crate::audit::record_entry`] from the command handlers of
//! other features.

mod error;
pub mod queries;
pub mod routes;


pub use error::AuditQueryError;
pub use queries::ListAuditLogsQuery;
pub use routes::audit_routes;
