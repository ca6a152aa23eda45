//! Shared utilities for feature modules
//!
//! - **validation**: Input validation utilities
//! - **test_helpers**: In-memory stores and request builders (test-only)

pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use validation::{non_blank, resolve_limit, ValidationError};
