pub mod list_logs;
pub mod record_history;
pub mod stats;

pub use list_logs::ListAuditLogsQuery;
