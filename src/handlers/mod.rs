//! HTTP Endpoint Handlers
//!
//! Every endpoint is a GET taking query-string parameters. Parameters arrive
//! as optional raw strings so that lenient inputs (empty fields, garbage
//! limit values) can be corrected silently instead of tripping the
//! deserializer; only a missing anchor year is a hard client error.

pub mod catalog;
pub mod ranking;
pub mod summary;

use crate::server::ApiError;

/// Empty and whitespace-only values are treated as absent, matching what the
/// front end submits for untouched form fields.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The anchor predicate: a missing or unparsable year is a validation fault
/// and no query is issued.
fn require_year(raw: &Option<String>) -> Result<i32, ApiError> {
    non_empty(raw)
        .and_then(|v| v.parse::<i32>().ok())
        .ok_or(ApiError::MissingParam("year"))
}

/// Optional year for catalog lookups.
fn opt_year(raw: &Option<String>) -> Option<i32> {
    non_empty(raw).and_then(|v| v.parse::<i32>().ok())
}

/// Non-numeric limit input counts as absent; the clamp supplies the default.
fn parse_limit(raw: &Option<String>) -> Option<i64> {
    non_empty(raw).and_then(|v| v.parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_params_count_as_absent() {
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&Some("".to_string())), None);
        assert_eq!(non_empty(&Some(" PASTO ".to_string())), Some("PASTO"));
        assert_eq!(non_empty(&None), None);
    }

    #[test]
    fn test_missing_or_garbled_year_is_a_validation_fault() {
        assert!(require_year(&None).is_err());
        assert!(require_year(&Some("twenty".to_string())).is_err());
        assert_eq!(require_year(&Some("20191".to_string())).unwrap(), 20191);
    }

    #[test]
    fn test_garbled_limit_is_silently_absent() {
        assert_eq!(parse_limit(&Some("lots".to_string())), None);
        assert_eq!(parse_limit(&Some("50".to_string())), Some(50));
    }
}
