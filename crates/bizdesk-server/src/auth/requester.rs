//! Authenticated requester extraction
//!
//! Token validation happens in the authenticating gateway in front of this
//! service. The gateway forwards the verified identity as headers:
//!
//! - `x-user-id`: numeric user id
//! - `x-username`: login name, snapshotted into audit entries
//! - `x-user-role`: one of `ADMIN`, `RECEPTION`, `SALESMAN`, `SERVICE_ENGINEER`, `OFFICE_STAFF`
//!
//! Requests missing any of them are rejected with 401 before a handler runs.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use bizdesk_common::types::UserRole;
use std::net::SocketAddr;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USERNAME_HEADER: &str = "x-username";
pub const USER_ROLE_HEADER: &str = "x-user-role";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
    /// Client address, when it can be determined
    pub ip_address: Option<String>,
}

impl Requester {
    pub fn new(user_id: i64, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
            ip_address: None,
        }
    }

    fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let user_id = header(headers, USER_ID_HEADER)?
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER)))?;
        let username = header(headers, USERNAME_HEADER)?.to_string();
        let role = header(headers, USER_ROLE_HEADER)?
            .parse::<UserRole>()
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(Self::new(user_id, username, role))
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", name)))
}

/// First hop of `x-forwarded-for`, falling back to the peer address.
fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut requester = Self::from_headers(&parts.headers)?;
        requester.ip_address = client_ip(parts);

        Ok(requester)
    }
}
