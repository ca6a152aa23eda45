//! Role-based access policy
//!
//! Every gated operation goes through [`authorize`]; route handlers never
//! compare roles themselves.

use bizdesk_common::types::UserRole;
use thiserror::Error;

/// Operations guarded by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /api/audit/logs`
    ListAuditLogs,
    /// `GET /api/audit/logs/record/{module}/{record_id}`
    ViewRecordHistory,
    /// `GET /api/audit/stats`
    ViewAuditStats,
    CheckIn,
    CheckOut,
    /// Reading another employee's attendance record
    ViewAttendance,
    /// Listing attendance across all employees
    ListAllAttendance,
    CorrectAttendance,
}

/// Which roles an operation admits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Allowed {
    Anyone,
    Roles(&'static [UserRole]),
}

const AUDIT_READERS: &[UserRole] = &[UserRole::Admin, UserRole::Reception];
const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

impl Operation {
    fn allowed(self) -> Allowed {
        match self {
            Operation::ListAuditLogs | Operation::ViewRecordHistory => {
                Allowed::Roles(AUDIT_READERS)
            },
            Operation::ViewAuditStats => Allowed::Roles(ADMIN_ONLY),
            Operation::CheckIn | Operation::CheckOut => Allowed::Anyone,
            Operation::ViewAttendance | Operation::ListAllAttendance => {
                Allowed::Roles(AUDIT_READERS)
            },
            Operation::CorrectAttendance => Allowed::Roles(ADMIN_ONLY),
        }
    }

    fn denial_reason(self) -> &'static str {
        match self {
            Operation::ListAuditLogs | Operation::ViewRecordHistory => {
                "Only admin and reception can view audit logs"
            },
            Operation::ViewAuditStats => "Only admin can view audit statistics",
            Operation::CheckIn => "Check-in is not permitted for this role",
            Operation::CheckOut => "Only the employee who checked in can check out",
            Operation::ViewAttendance => {
                "Only admin and reception can view other employees' attendance"
            },
            Operation::ListAllAttendance => {
                "Only admin and reception can list other employees' attendance"
            },
            Operation::CorrectAttendance => "Only admin can correct attendance records",
        }
    }
}

/// A request rejected by the policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct AccessDenied {
    pub operation: Operation,
    pub role: UserRole,
    pub reason: &'static str,
}

impl AccessDenied {
    pub fn new(operation: Operation, role: UserRole) -> Self {
        Self {
            operation,
            role,
            reason: operation.denial_reason(),
        }
    }
}

/// Decide whether `role` may perform `operation`.
pub fn authorize(operation: Operation, role: UserRole) -> Result<(), AccessDenied> {
    match operation.allowed() {
        Allowed::Anyone => Ok(()),
        Allowed::Roles(roles) if roles.contains(&role) => Ok(()),
        Allowed::Roles(_) => Err(AccessDenied::new(operation, role)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_reads_admit_admin_and_reception_only() {
        for op in [Operation::ListAuditLogs, Operation::ViewRecordHistory] {
            for role in UserRole::ALL {
                let expected = matches!(role, UserRole::Admin | UserRole::Reception);
                assert_eq!(authorize(op, role).is_ok(), expected, "{:?} {:?}", op, role);
            }
        }
    }

    #[test]
    fn test_stats_admit_admin_only() {
        for role in UserRole::ALL {
            let result = authorize(Operation::ViewAuditStats, role);
            assert_eq!(result.is_ok(), role == UserRole::Admin);
        }
    }

    #[test]
    fn test_denial_carries_reason() {
        let denied = authorize(Operation::ViewAuditStats, UserRole::Reception).unwrap_err();
        assert_eq!(denied.to_string(), "Only admin can view audit statistics");
        assert_eq!(denied.role, UserRole::Reception);

        let denied = authorize(Operation::ListAuditLogs, UserRole::Salesman).unwrap_err();
        assert_eq!(denied.to_string(), "Only admin and reception can view audit logs");
    }

    #[test]
    fn test_every_role_may_check_in() {
        for role in UserRole::ALL {
            assert!(authorize(Operation::CheckIn, role).is_ok());
        }
    }

    #[test]
    fn test_corrections_are_admin_only() {
        assert!(authorize(Operation::CorrectAttendance, UserRole::Admin).is_ok());
        assert!(authorize(Operation::CorrectAttendance, UserRole::Reception).is_err());
        assert!(authorize(Operation::CorrectAttendance, UserRole::OfficeStaff).is_err());
    }
}
