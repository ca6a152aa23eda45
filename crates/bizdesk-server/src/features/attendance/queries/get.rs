//! Get one attendance record
//!
//! Employees may read their own records; ADMIN and RECEPTION may read anyone's.
//! For other roles the lookup is scoped to the requester, so a missing id and
//! another employee's id are both denied.

use crate::auth::{authorize, Operation, Requester};
use crate::features::attendance::{AttendanceError, AttendanceStore, VerifiedAttendance};

#[tracing::instrument(skip(store, requester), fields(requester_id = requester.user_id))]
pub async fn handle(
    store: &dyn AttendanceStore,
    requester: &Requester,
    attendance_id: i64,
) -> Result<VerifiedAttendance, AttendanceError> {
    match authorize(Operation::ViewAttendance, requester.role) {
        Ok(()) => store
            .find(attendance_id)
            .await?
            .ok_or(AttendanceError::NotFound(attendance_id)),
        Err(denied) => store
            .find(attendance_id)
            .await?
            .filter(|record| record.employee_id == requester.user_id)
            .ok_or_else(|| denied.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attendance::NewAttendance;
    use crate::features::shared::test_helpers::*;

    #[tokio::test]
    async fn test_other_roles_are_denied_missing_and_foreign_ids() {
        let store = MemoryAttendanceStore::default();
        let record = store
            .insert(NewAttendance {
                employee_id: salesman().user_id,
                ..Default::default()
            })
            .await
            .unwrap();

        let foreign = handle(&store, &engineer(), record.id).await.unwrap_err();
        let missing = handle(&store, &engineer(), 999).await.unwrap_err();
        assert!(matches!(foreign, AttendanceError::Forbidden(_)));
        assert!(matches!(missing, AttendanceError::Forbidden(_)));

        let own = handle(&store, &salesman(), record.id).await.unwrap();
        assert_eq!(own.id, record.id);
    }

    #[tokio::test]
    async fn test_readers_see_not_found() {
        let store = MemoryAttendanceStore::default();
        let err = handle(&store, &reception(), 999).await.unwrap_err();
        assert!(matches!(err, AttendanceError::NotFound(999)));
    }
}
