//! Verified attendance persistence

use async_trait::async_trait;
use bizdesk_common::types::VerificationStatus;
use sqlx::PgPool;
use tracing::debug;

use super::types::{AttendanceFilter, NewAttendance, VerifiedAttendance};
use crate::db::{DbError, DbResult};

/// Storage for verified attendance rows. Rows are never deleted.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert a check-in. Fails with [`DbError::Conflict`] if the employee
    /// already has an open record.
    async fn insert(&self, record: NewAttendance) -> DbResult<VerifiedAttendance>;

    async fn find(&self, id: i64) -> DbResult<Option<VerifiedAttendance>>;

    /// Close an open record, appending `notes` to any existing notes.
    /// `None` if it does not exist or is already closed.
    async fn check_out(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> DbResult<Option<VerifiedAttendance>>;

    /// Matching records, newest check-in first.
    async fn list(&self, filter: &AttendanceFilter, limit: i64)
        -> DbResult<Vec<VerifiedAttendance>>;

    /// Overwrite the verification status and append `note` to the notes.
    async fn set_status(
        &self,
        id: i64,
        status: VerificationStatus,
        note: &str,
    ) -> DbResult<Option<VerifiedAttendance>>;
}

const ATTENDANCE_COLUMNS: &str = "id, employee_id, check_in_time, check_out_time, \
     face_image_path, face_confidence, face_verified, \
     latitude, longitude, address, formatted_address, location_accuracy, location_type, \
     place_id, location_verified, verification_method, verification_status, \
     device_info, ip_address, mock_location_detected, notes, verification_data, \
     created_at, updated_at";

/// PostgreSQL-backed [`AttendanceStore`]
#[derive(Clone)]
pub struct PgAttendanceStore {
    pool: PgPool,
}

impl PgAttendanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn insert(&self, record: NewAttendance) -> DbResult<VerifiedAttendance> {
        let employee_id = record.employee_id;

        let inserted = sqlx::query_as::<_, VerifiedAttendance>(&format!(
            r#"
            INSERT INTO verified_attendance (
                employee_id, face_image_path, face_confidence, face_verified,
                latitude, longitude, address, formatted_address, location_accuracy,
                location_type, place_id, location_verified, verification_method,
                verification_status, device_info, ip_address, mock_location_detected,
                notes, verification_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(record.employee_id)
        .bind(record.face_image_path)
        .bind(record.face_confidence)
        .bind(record.face_verified)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.address)
        .bind(record.formatted_address)
        .bind(record.location_accuracy)
        .bind(record.location_type)
        .bind(record.place_id)
        .bind(record.location_verified)
        .bind(record.verification_method)
        .bind(record.verification_status.as_str())
        .bind(record.device_info)
        .bind(record.ip_address)
        .bind(record.mock_location_detected)
        .bind(record.notes)
        .bind(record.verification_data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_unique_violation(
                e,
                format!("Employee {} already has an open check-in", employee_id),
            )
        })?;

        debug!(
            attendance_id = inserted.id,
            employee_id,
            "Inserted verified attendance"
        );

        Ok(inserted)
    }

    async fn find(&self, id: i64) -> DbResult<Option<VerifiedAttendance>> {
        let record = sqlx::query_as::<_, VerifiedAttendance>(&format!(
            "SELECT {} FROM verified_attendance WHERE id = $1",
            ATTENDANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn check_out(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> DbResult<Option<VerifiedAttendance>> {
        // The IS NULL guard makes a concurrent second check-out update nothing
        let record = sqlx::query_as::<_, VerifiedAttendance>(&format!(
            r#"
            UPDATE verified_attendance
            SET check_out_time = NOW(),
                notes = CASE
                    WHEN $2::TEXT IS NULL THEN notes
                    WHEN notes IS NULL OR notes = '' THEN $2
                    ELSE notes || E'\n' || $2
                END,
                updated_at = NOW()
            WHERE id = $1 AND check_out_time IS NULL
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(
        &self,
        filter: &AttendanceFilter,
        limit: i64,
    ) -> DbResult<Vec<VerifiedAttendance>> {
        let mut sql = format!(
            "SELECT {} FROM verified_attendance WHERE 1=1",
            ATTENDANCE_COLUMNS
        );
        let mut bind_count = 1;

        if filter.employee_id.is_some() {
            sql.push_str(&format!(" AND employee_id = ${}", bind_count));
            bind_count += 1;
        }
        if filter.date.is_some() {
            sql.push_str(&format!(
                " AND check_in_time >= ${} AND check_in_time < ${}",
                bind_count,
                bind_count + 1
            ));
            bind_count += 2;
        }
        if filter.status.is_some() {
            sql.push_str(&format!(" AND verification_status = ${}", bind_count));
            bind_count += 1;
        }

        sql.push_str(" ORDER BY check_in_time DESC, id DESC");
        sql.push_str(&format!(" LIMIT ${}", bind_count));

        let mut query = sqlx::query_as::<_, VerifiedAttendance>(&sql);

        if let Some(employee_id) = filter.employee_id {
            query = query.bind(employee_id);
        }
        if let Some(date) = filter.date {
            let (start, end) = AttendanceFilter::day_bounds(date);
            query = query.bind(start).bind(end);
        }
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }

        let records = query.bind(limit).fetch_all(&self.pool).await?;

        debug!(count = records.len(), "Queried verified attendance");

        Ok(records)
    }

    async fn set_status(
        &self,
        id: i64,
        status: VerificationStatus,
        note: &str,
    ) -> DbResult<Option<VerifiedAttendance>> {
        let record = sqlx::query_as::<_, VerifiedAttendance>(&format!(
            r#"
            UPDATE verified_attendance
            SET verification_status = $2,
                notes = CASE
                    WHEN notes IS NULL OR notes = '' THEN $3
                    ELSE notes || E'\n' || $3
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(note)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
