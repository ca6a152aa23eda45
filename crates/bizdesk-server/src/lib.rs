//! Bizdesk Server Library
//!
//! Audit trail and verified attendance backend for the Bizdesk business suite.
//!
//! # Overview
//!
//! - **Audit trail**: append-only log of every mutation, with role-gated
//!   listing, per-record history and aggregate statistics
//! - **Verified attendance**: biometric + GPS check-in/out records
//! - **Authorization**: one policy function deciding every role check
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity as `x-user-id`, `x-username` and `x-user-role` headers.
//!
//! # Architecture
//!
//! - **Commands** (write operations) each append one audit entry
//! - **Queries** (read operations) authorize first, then read
//! - Stores sit behind traits ([`audit::AuditStore`],
//!   [`features::attendance::AttendanceStore`]) with PostgreSQL implementations
//!
//! # Example
//!
//! ```no_run
//! use bizdesk_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     api::serve(pool, config).await
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, AppResult};
