//! Audit data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Audit Query Constants
// ============================================================================

/// Default number of audit entries returned per query
pub const DEFAULT_AUDIT_QUERY_LIMIT: i64 = 100;

/// Maximum number of audit entries that can be returned in a single query.
pub const MAX_AUDIT_QUERY_LIMIT: i64 = 1000;

/// Number of users reported in the statistics leaderboard
pub const TOP_USERS_LIMIT: i64 = 10;

/// Audit log entry as stored and as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: i64,
    /// User who performed the action
    pub user_id: i64,
    /// Username at the time of the action
    pub username: String,
    /// Verb such as `CREATE` or `UPDATE`
    pub action: String,
    /// Subsystem the record belongs to, e.g. `customers`
    pub module: String,
    /// String form of the affected record's key
    pub record_id: String,
    pub record_type: String,
    /// Serialized description of what changed
    pub changes: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Filters for listing audit logs. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub module: Option<String>,
    pub user_id: Option<i64>,
    pub action: Option<String>,
}

impl AuditFilter {
    #[cfg(test)]
    pub fn matches(&self, log: &AuditLog) -> bool {
        self.module.as_deref().map_or(true, |m| log.module == m)
            && self.user_id.map_or(true, |u| log.user_id == u)
            && self.action.as_deref().map_or(true, |a| log.action == a)
    }
}

/// Actions recorded by the attendance commands
///
/// Other modules write their own free-form verbs (`CREATE`, `UPDATE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CheckIn,
    CheckOut,
    Correct,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "CHECK_IN",
            Self::CheckOut => "CHECK_OUT",
            Self::Correct => "CORRECT",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActionCount {
    pub action: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModuleCount {
    pub module: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserCount {
    pub username: String,
    pub count: i64,
}

/// Aggregate view over the whole audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_logs: i64,
    /// Ordered by count descending, then action
    pub actions: Vec<ActionCount>,
    /// Ordered by count descending, then module
    pub modules: Vec<ModuleCount>,
    /// At most [`TOP_USERS_LIMIT`] entries, by count descending, then username
    pub top_users: Vec<UserCount>,
}

// ============================================================================
// Write Path
// ============================================================================

/// Input for appending an audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub user_id: i64,
    pub username: String,
    pub action: String,
    pub module: String,
    pub record_id: String,
    pub record_type: String,
    pub changes: Option<String>,
    pub ip_address: Option<String>,
}

impl NewAuditEntry {
    pub fn builder() -> AuditEntryBuilder {
        AuditEntryBuilder::default()
    }
}

/// Builder for [`NewAuditEntry`]
#[derive(Debug, Clone, Default)]
pub struct AuditEntryBuilder {
    user_id: Option<i64>,
    username: Option<String>,
    action: Option<String>,
    module: Option<String>,
    record_id: Option<String>,
    record_type: Option<String>,
    changes: Option<String>,
    ip_address: Option<String>,
}

impl AuditEntryBuilder {
    /// Set both user fields from the authenticated requester.
    pub fn actor(mut self, user_id: i64, username: impl Into<String>) -> Self {
        self.user_id = Some(user_id);
        self.username = Some(username.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn record(mut self, record_type: impl Into<String>, record_id: impl ToString) -> Self {
        self.record_type = Some(record_type.into());
        self.record_id = Some(record_id.to_string());
        self
    }

    pub fn changes(mut self, changes: impl Into<String>) -> Self {
        self.changes = Some(changes.into());
        self
    }

    /// Serialize `value` as the change description.
    pub fn changes_json(mut self, value: &serde_json::Value) -> Self {
        self.changes = Some(value.to_string());
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Build the entry, failing if a required field is missing or blank
    pub fn try_build(self) -> Result<NewAuditEntry, &'static str> {
        fn required(value: Option<String>, err: &'static str) -> Result<String, &'static str> {
            value.filter(|v| !v.trim().is_empty()).ok_or(err)
        }

        Ok(NewAuditEntry {
            user_id: self.user_id.ok_or("user_id is required")?,
            username: required(self.username, "username is required")?,
            action: required(self.action, "action is required")?,
            module: required(self.module, "module is required")?,
            record_id: required(self.record_id, "record_id is required")?,
            record_type: required(self.record_type, "record_type is required")?,
            changes: self.changes,
            ip_address: self.ip_address,
        })
    }
}
