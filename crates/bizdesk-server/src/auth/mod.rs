//! Authentication boundary and authorization policy

mod policy;
mod requester;

pub use policy::{authorize, AccessDenied, Operation};
pub use requester::{Requester, USERNAME_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
