//! List attendance records
//!
//! ADMIN and RECEPTION see every employee. Other roles are scoped to their
//! own records; naming a different `employee_id` is denied.

use bizdesk_common::types::VerificationStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::{authorize, Operation, Requester};
use crate::features::attendance::{
    AttendanceError, AttendanceFilter, AttendanceStore, VerifiedAttendance,
    DEFAULT_ATTENDANCE_QUERY_LIMIT, MAX_ATTENDANCE_QUERY_LIMIT,
};
use crate::features::shared::validation::resolve_limit;

/// Query parameters for `GET /api/attendance/verified`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAttendanceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    /// `YYYY-MM-DD`, matched against the UTC check-in day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ListAttendanceQuery {
    /// Build the store filter, narrowing it to the requester where the
    /// policy requires.
    fn scoped_filter(&self, requester: &Requester) -> Result<AttendanceFilter, AttendanceError> {
        let employee_id = match authorize(Operation::ListAllAttendance, requester.role) {
            Ok(()) => self.employee_id,
            Err(denied) => match self.employee_id {
                None => Some(requester.user_id),
                Some(id) if id == requester.user_id => Some(id),
                Some(_) => return Err(denied.into()),
            },
        };

        Ok(AttendanceFilter {
            employee_id,
            date: self.date,
            status: self.status,
        })
    }
}

#[tracing::instrument(skip(store, requester), fields(requester_id = requester.user_id))]
pub async fn handle(
    store: &dyn AttendanceStore,
    requester: &Requester,
    query: ListAttendanceQuery,
) -> Result<Vec<VerifiedAttendance>, AttendanceError> {
    let filter = query.scoped_filter(requester)?;
    let limit = resolve_limit(
        query.limit,
        DEFAULT_ATTENDANCE_QUERY_LIMIT,
        MAX_ATTENDANCE_QUERY_LIMIT,
    )?;

    let records = store.list(&filter, limit).await?;

    tracing::debug!(count = records.len(), "Listed attendance records");

    Ok(records)
}
