//! Audit log persistence

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::models::{
    ActionCount, AuditFilter, AuditLog, AuditStats, ModuleCount, NewAuditEntry, UserCount,
    TOP_USERS_LIMIT,
};
use crate::db::DbResult;

/// Storage for the append-only audit trail.
///
/// There is deliberately no update or delete method.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append an entry; id and timestamp are assigned by the store.
    async fn insert(&self, entry: NewAuditEntry) -> DbResult<AuditLog>;

    /// Entries matching `filter`, newest first, at most `limit` of them.
    async fn list(&self, filter: &AuditFilter, limit: i64) -> DbResult<Vec<AuditLog>>;

    /// Every entry for one record, newest first.
    async fn history(&self, module: &str, record_id: &str) -> DbResult<Vec<AuditLog>>;

    /// Totals and breakdowns computed over a single consistent snapshot.
    async fn stats(&self) -> DbResult<AuditStats>;

    /// Connectivity probe for health checks.
    async fn ping(&self) -> DbResult<()>;
}

const AUDIT_COLUMNS: &str = "id, user_id, username, action, module, record_id, record_type, \
                             changes, ip_address, timestamp";

/// PostgreSQL-backed [`AuditStore`]
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn insert(&self, entry: NewAuditEntry) -> DbResult<AuditLog> {
        let record = sqlx::query_as::<_, AuditLog>(&format!(
            r#"
            INSERT INTO audit_logs (
                user_id, username, action, module,
                record_id, record_type, changes, ip_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            AUDIT_COLUMNS
        ))
        .bind(entry.user_id)
        .bind(&entry.username)
        .bind(&entry.action)
        .bind(&entry.module)
        .bind(&entry.record_id)
        .bind(&entry.record_type)
        .bind(&entry.changes)
        .bind(&entry.ip_address)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            audit_id = record.id,
            action = %record.action,
            module = %record.module,
            record_id = %record.record_id,
            "Created audit log entry"
        );

        Ok(record)
    }

    async fn list(&self, filter: &AuditFilter, limit: i64) -> DbResult<Vec<AuditLog>> {
        let mut sql = format!("SELECT {} FROM audit_logs WHERE 1=1", AUDIT_COLUMNS);
        let mut bind_count = 1;

        if filter.module.is_some() {
            sql.push_str(&format!(" AND module = ${}", bind_count));
            bind_count += 1;
        }
        if filter.user_id.is_some() {
            sql.push_str(&format!(" AND user_id = ${}", bind_count));
            bind_count += 1;
        }
        if filter.action.is_some() {
            sql.push_str(&format!(" AND action = ${}", bind_count));
            bind_count += 1;
        }

        sql.push_str(" ORDER BY timestamp DESC, id DESC");
        sql.push_str(&format!(" LIMIT ${}", bind_count));

        let mut query = sqlx::query_as::<_, AuditLog>(&sql);

        // Bind in the same order the conditions were appended
        if let Some(module) = &filter.module {
            query = query.bind(module);
        }
        if let Some(user_id) = filter.user_id {
            query = query.bind(user_id);
        }
        if let Some(action) = &filter.action {
            query = query.bind(action);
        }

        let records = query.bind(limit).fetch_all(&self.pool).await?;

        debug!(count = records.len(), "Queried audit logs");

        Ok(records)
    }

    async fn history(&self, module: &str, record_id: &str) -> DbResult<Vec<AuditLog>> {
        let records = sqlx::query_as::<_, AuditLog>(&format!(
            r#"
            SELECT {}
            FROM audit_logs
            WHERE module = $1 AND record_id = $2
            ORDER BY timestamp DESC, id DESC
            "#,
            AUDIT_COLUMNS
        ))
        .bind(module)
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            module = %module,
            record_id = %record_id,
            count = records.len(),
            "Retrieved record history"
        );

        Ok(records)
    }

    async fn stats(&self) -> DbResult<AuditStats> {
        // One snapshot, so total_logs always equals the sum of each breakdown.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total_logs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&mut *tx)
            .await?;

        let actions = sqlx::query_as::<_, ActionCount>(
            r#"
            SELECT action, COUNT(*) AS count
            FROM audit_logs
            GROUP BY action
            ORDER BY count DESC, action ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let modules = sqlx::query_as::<_, ModuleCount>(
            r#"
            SELECT module, COUNT(*) AS count
            FROM audit_logs
            GROUP BY module
            ORDER BY count DESC, module ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let top_users = sqlx::query_as::<_, UserCount>(
            r#"
            SELECT username, COUNT(*) AS count
            FROM audit_logs
            GROUP BY username
            ORDER BY count DESC, username ASC
            LIMIT $1
            "#,
        )
        .bind(TOP_USERS_LIMIT)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(total_logs, "Computed audit statistics");

        Ok(AuditStats {
            total_logs,
            actions,
            modules,
            top_users,
        })
    }

    async fn ping(&self) -> DbResult<()> {
        crate::db::health_check(&self.pool).await
    }
}
