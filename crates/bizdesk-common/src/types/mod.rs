//! Common types used across Bizdesk

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

// ============================================================================
// User Roles
// ============================================================================

/// Role carried by every authenticated user.
///
/// Roles are issued by the user-management service; this backend only reads
/// them to decide what a requester may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Reception,
    Salesman,
    ServiceEngineer,
    /// Legacy role, merged into reception duties but still present on old accounts.
    OfficeStaff,
}

impl UserRole {
    /// Every role, in declaration order.
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::Reception,
        UserRole::Salesman,
        UserRole::ServiceEngineer,
        UserRole::OfficeStaff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Reception => "RECEPTION",
            Self::Salesman => "SALESMAN",
            Self::ServiceEngineer => "SERVICE_ENGINEER",
            Self::OfficeStaff => "OFFICE_STAFF",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = CommonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "RECEPTION" => Ok(Self::Reception),
            "SALESMAN" => Ok(Self::Salesman),
            "SERVICE_ENGINEER" => Ok(Self::ServiceEngineer),
            "OFFICE_STAFF" => Ok(Self::OfficeStaff),
            _ => Err(CommonError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Attendance Verification
// ============================================================================

/// Outcome recorded on a verified attendance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Verified,
    Failed,
    Pending,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Failed => "FAILED",
            Self::Pending => "PENDING",
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = CommonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VERIFIED" => Ok(Self::Verified),
            "FAILED" => Ok(Self::Failed),
            "PENDING" => Ok(Self::Pending),
            _ => Err(CommonError::InvalidVerificationStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for VerificationStatus {
    type Error = CommonError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
