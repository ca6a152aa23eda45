//! Bizdesk Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging setup, and error handling for the Bizdesk backend.
//!
//! # Overview
//!
//! - **Error Handling**: [`CommonError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber configuration shared by every binary
//! - **Types**: domain enums shared across crates (user roles, verification status)
//!
//! # Example
//!
//! ```no_run
//! use bizdesk_common::types::UserRole;
//!
//! fn parse(raw: &str) -> bizdesk_common::Result<UserRole> {
//!     raw.parse()
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CommonError, Result};
