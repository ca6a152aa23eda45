//! Shared validation utilities
//!
//! Provides the input checks used by both the audit and attendance slices.
//!
//! # Examples
//!
//! ```rust,ignore
//! use bizdesk_server::features::shared::validation::{resolve_limit, validate_range};
//!
//! let limit = resolve_limit(query.limit, DEFAULT_AUDIT_QUERY_LIMIT, max_limit)?;
//! validate_range("latitude", command.latitude, -90.0, 90.0)?;
//! ```

use thiserror::Error;

/// Errors produced by the shared validators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("limit must be at least 1 (got {0})")]
    LimitTooSmall(i64),

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{0} is required and cannot be blank")]
    Blank(&'static str),
}

/// Resolve a requested row limit
///
/// # Rules
/// - `None` falls back to `default`
/// - Values below 1 are rejected
/// - Values above `max` are clamped to `max`
pub fn resolve_limit(requested: Option<i64>, default: i64, max: i64) -> Result<i64, ValidationError> {
    match requested {
        None => Ok(default.min(max)),
        Some(limit) if limit < 1 => Err(ValidationError::LimitTooSmall(limit)),
        Some(limit) => Ok(limit.min(max)),
    }
}

/// Check that an optional value lies within `[min, max]`. `None` always passes.
pub fn validate_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    match value {
        // NaN is never contained, so it is rejected too
        Some(v) if !(min..=max).contains(&v) => Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value: v,
        }),
        _ => Ok(()),
    }
}

pub fn validate_non_negative(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.is_nan() || v < 0.0 => Err(ValidationError::Negative { field, value: v }),
        _ => Ok(()),
    }
}

/// Require a non-blank string, returning it trimmed
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(trimmed)
}

/// Treat empty or whitespace-only query parameters as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_limit_defaults() {
        assert_eq!(resolve_limit(None, 100, 1000), Ok(100));
        assert_eq!(resolve_limit(None, 100, 50), Ok(50));
    }

    #[test]
    fn test_resolve_limit_rejects_non_positive() {
        assert_eq!(resolve_limit(Some(0), 100, 1000), Err(ValidationError::LimitTooSmall(0)));
        assert_eq!(resolve_limit(Some(-5), 100, 1000), Err(ValidationError::LimitTooSmall(-5)));
    }

    #[test]
    fn test_resolve_limit_clamps() {
        assert_eq!(resolve_limit(Some(5000), 100, 1000), Ok(1000));
        assert_eq!(resolve_limit(Some(1), 100, 1000), Ok(1));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("latitude", None, -90.0, 90.0).is_ok());
        assert!(validate_range("latitude", Some(-90.0), -90.0, 90.0).is_ok());
        assert!(validate_range("latitude", Some(90.5), -90.0, 90.0).is_err());
        assert!(validate_range("face_confidence", Some(f64::NAN), 0.0, 100.0).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("location_accuracy", Some(0.0)).is_ok());
        assert!(validate_non_negative("location_accuracy", Some(-1.0)).is_err());
        assert!(validate_non_negative("location_accuracy", None).is_ok());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("reason", "  late badge  "), Ok("late badge"));
        assert_eq!(require_text("reason", " \t"), Err(ValidationError::Blank("reason")));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("".to_string())), None);
        assert_eq!(non_blank(Some(" customers ".to_string())), Some("customers".to_string()));
        assert_eq!(non_blank(None), None);
    }

    proptest! {
        #[test]
        fn prop_resolved_limit_within_bounds(requested in 1i64..100_000, max in 1i64..5000) {
            let limit = resolve_limit(Some(requested), 100, max).unwrap();
            prop_assert!(limit >= 1 && limit <= max);
            prop_assert!(limit <= requested);
        }
    }
}
