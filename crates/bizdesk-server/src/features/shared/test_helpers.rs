//! Test helpers and fixtures for route tests
//!
//! In-memory stores that mirror the PostgreSQL stores' ordering and conflict
//! rules, plus request builders that attach gateway identity headers.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::features::shared::test_helpers::*;
//!
//! let audit = Arc::new(MemoryAuditStore::default());
//! audit.push(TestAuditLog::new("customers", "42").by(3, "asha").action("UPDATE"));
//!
//! let app = test_router(audit.clone(), Arc::new(MemoryAttendanceStore::default()));
//! let response = app
//!     .oneshot(get_as("/api/audit/logs", &admin()))
//!     .await
//!     .unwrap();
//! ```

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use bizdesk_common::types::{UserRole, VerificationStatus};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::audit::{
    ActionCount, AuditFilter, AuditLog, AuditStats, AuditStore, ModuleCount, NewAuditEntry,
    UserCount, TOP_USERS_LIMIT,
};
use crate::auth::{Requester, USERNAME_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::config::AuditConfig;
use crate::db::{DbError, DbResult};
use crate::features::attendance::{
    AttendanceFilter, AttendanceStore, NewAttendance, VerifiedAttendance,
};
use crate::features::{router, FeatureState};

// ============================================================================
// Requesters
// ============================================================================

pub fn admin() -> Requester {
    Requester::new(1, "meera", UserRole::Admin)
}

pub fn reception() -> Requester {
    Requester::new(2, "priya", UserRole::Reception)
}

pub fn salesman() -> Requester {
    Requester::new(9, "arun", UserRole::Salesman)
}

pub fn engineer() -> Requester {
    Requester::new(12, "kiran", UserRole::ServiceEngineer)
}

// ============================================================================
// Requests
// ============================================================================

/// Build a request carrying `requester`'s identity headers
pub fn request_as(
    method: Method,
    uri: &str,
    requester: &Requester,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, requester.user_id.to_string())
        .header(USERNAME_HEADER, &requester.username)
        .header(USER_ROLE_HEADER, requester.role.as_str())
        .header("x-forwarded-for", "203.0.113.7");

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get_as(uri: &str, requester: &Requester) -> Request<Body> {
    request_as(Method::GET, uri, requester, None)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Feature routes mounted under `/api`, as in the production router, over the
/// given stores with default audit settings
pub fn test_router(
    audit: Arc<MemoryAuditStore>,
    attendance: Arc<MemoryAttendanceStore>,
) -> Router {
    Router::new().nest(
        "/api",
        router(FeatureState {
            audit,
            attendance,
            audit_config: AuditConfig::default(),
        }),
    )
}

// ============================================================================
// Audit fixtures
// ============================================================================

/// Builder for audit log rows seeded straight into [`MemoryAuditStore`]
#[derive(Debug, Clone)]
pub struct TestAuditLog {
    log: AuditLog,
}

impl TestAuditLog {
    pub fn new(module: &str, record_id: &str) -> Self {
        Self {
            log: AuditLog {
                id: 0,
                user_id: 1,
                username: "meera".to_string(),
                action: "UPDATE".to_string(),
                module: module.to_string(),
                record_id: record_id.to_string(),
                record_type: module.trim_end_matches('s').to_string(),
                changes: None,
                ip_address: None,
                timestamp: Utc::now(),
            },
        }
    }

    pub fn by(mut self, user_id: i64, username: &str) -> Self {
        self.log.user_id = user_id;
        self.log.username = username.to_string();
        self
    }

    pub fn action(mut self, action: &str) -> Self {
        self.log.action = action.to_string();
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.log.timestamp = timestamp;
        self
    }
}

/// Fixed base instant so seeded timestamps are deterministic
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_773_446_400, 0).unwrap()
}

pub fn minutes_after_base(minutes: i64) -> DateTime<Utc> {
    base_time() + TimeDelta::minutes(minutes)
}

// ============================================================================
// In-memory audit store
// ============================================================================

#[derive(Default)]
pub struct MemoryAuditStore {
    logs: Mutex<Vec<AuditLog>>,
    reads: AtomicUsize,
    fail_inserts: bool,
}

impl MemoryAuditStore {
    /// A store whose writes always fail, for exercising the swallow path
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Default::default()
        }
    }

    pub fn push(&self, fixture: TestAuditLog) -> AuditLog {
        let mut logs = self.logs.lock().unwrap();
        let mut log = fixture.log;
        log.id = logs.len() as i64 + 1;
        logs.push(log.clone());
        log
    }

    /// Number of read calls served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn all(&self) -> Vec<AuditLog> {
        self.logs.lock().unwrap().clone()
    }

    fn read(&self) -> Vec<AuditLog> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut logs = self.all();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        logs
    }
}

fn ranked<T>(counts: HashMap<String, i64>, make: impl Fn(String, i64) -> T) -> Vec<T> {
    let mut pairs: Vec<(String, i64)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.into_iter().map(|(name, count)| make(name, count)).collect()
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, entry: NewAuditEntry) -> DbResult<AuditLog> {
        if self.fail_inserts {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        let mut logs = self.logs.lock().unwrap();
        let log = AuditLog {
            id: logs.len() as i64 + 1,
            user_id: entry.user_id,
            username: entry.username,
            action: entry.action,
            module: entry.module,
            record_id: entry.record_id,
            record_type: entry.record_type,
            changes: entry.changes,
            ip_address: entry.ip_address,
            timestamp: Utc::now(),
        };
        logs.push(log.clone());
        Ok(log)
    }

    async fn list(&self, filter: &AuditFilter, limit: i64) -> DbResult<Vec<AuditLog>> {
        Ok(self
            .read()
            .into_iter()
            .filter(|log| filter.matches(log))
            .take(limit as usize)
            .collect())
    }

    async fn history(&self, module: &str, record_id: &str) -> DbResult<Vec<AuditLog>> {
        Ok(self
            .read()
            .into_iter()
            .filter(|log| log.module == module && log.record_id == record_id)
            .collect())
    }

    async fn stats(&self) -> DbResult<AuditStats> {
        let logs = self.read();

        let mut actions = HashMap::new();
        let mut modules = HashMap::new();
        let mut users = HashMap::new();
        for log in &logs {
            *actions.entry(log.action.clone()).or_insert(0) += 1;
            *modules.entry(log.module.clone()).or_insert(0) += 1;
            *users.entry(log.username.clone()).or_insert(0) += 1;
        }

        let mut top_users = ranked(users, |username, count| UserCount { username, count });
        top_users.truncate(TOP_USERS_LIMIT as usize);

        Ok(AuditStats {
            total_logs: logs.len() as i64,
            actions: ranked(actions, |action, count| ActionCount { action, count }),
            modules: ranked(modules, |module, count| ModuleCount { module, count }),
            top_users,
        })
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

// ============================================================================
// In-memory attendance store
// ============================================================================

#[derive(Default)]
pub struct MemoryAttendanceStore {
    records: Mutex<Vec<VerifiedAttendance>>,
}

impl MemoryAttendanceStore {
    pub fn all(&self) -> Vec<VerifiedAttendance> {
        self.records.lock().unwrap().clone()
    }
}

/// Same rule as the SQL `CASE`: empty notes are replaced, others get a new line
fn append_note(record: &mut VerifiedAttendance, note: &str) {
    record.notes = Some(match record.notes.take().filter(|n| !n.is_empty()) {
        Some(existing) => format!("{}\n{}", existing, note),
        None => note.to_string(),
    });
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn insert(&self, new: NewAttendance) -> DbResult<VerifiedAttendance> {
        let mut records = self.records.lock().unwrap();

        if records
            .iter()
            .any(|r| r.employee_id == new.employee_id && r.is_open())
        {
            return Err(DbError::Conflict(format!(
                "Employee {} already has an open check-in",
                new.employee_id
            )));
        }

        let now = Utc::now();
        let record = VerifiedAttendance {
            id: records.len() as i64 + 1,
            employee_id: new.employee_id,
            check_in_time: now,
            check_out_time: None,
            face_image_path: new.face_image_path,
            face_confidence: new.face_confidence,
            face_verified: new.face_verified,
            latitude: new.latitude,
            longitude: new.longitude,
            address: new.address,
            formatted_address: new.formatted_address,
            location_accuracy: new.location_accuracy,
            location_type: new.location_type,
            place_id: new.place_id,
            location_verified: new.location_verified,
            verification_method: new.verification_method,
            verification_status: new.verification_status,
            device_info: new.device_info,
            ip_address: new.ip_address,
            mock_location_detected: new.mock_location_detected,
            notes: new.notes,
            verification_data: new.verification_data,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: i64) -> DbResult<Option<VerifiedAttendance>> {
        Ok(self.all().into_iter().find(|r| r.id == id))
    }

    async fn check_out(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> DbResult<Option<VerifiedAttendance>> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.id == id && r.is_open()) else {
            return Ok(None);
        };

        let now = Utc::now();
        record.check_out_time = Some(now);
        record.updated_at = now;
        if let Some(note) = notes {
            append_note(record, &note);
        }
        Ok(Some(record.clone()))
    }

    async fn list(
        &self,
        filter: &AttendanceFilter,
        limit: i64,
    ) -> DbResult<Vec<VerifiedAttendance>> {
        let mut records: Vec<_> = self
            .all()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        records.sort_by(|a, b| {
            b.check_in_time
                .cmp(&a.check_in_time)
                .then(b.id.cmp(&a.id))
        });
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn set_status(
        &self,
        id: i64,
        status: VerificationStatus,
        note: &str,
    ) -> DbResult<Option<VerifiedAttendance>> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        record.verification_status = status;
        append_note(record, note);
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }
}
