//! Hand-written request validation: every endpoint schema checks its fields
//! through a [`Validator`] so a single 400 response can enumerate all
//! failures instead of stopping at the first.

use lazy_static::lazy_static;
use regex::Regex;
use time::Date;

use crate::error::{ApiError, FieldError};
use crate::model::DATE_FORMAT;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Parse a `YYYY-MM-DD` date as used on the wire and in CSV output.
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, DATE_FORMAT).ok()
}

/// Accumulates per-field failures for one request.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// A required field that was absent from the body.
    pub fn missing(&mut self, field: &'static str) {
        self.error(field, format!("{field} is required"));
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_date("2025-02-28"), Some(date!(2025 - 02 - 28)));
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("28/02/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn collects_every_failure() {
        let mut validator = Validator::new();
        validator.missing("bankName");
        validator.error("initialBalance", "Balance cannot be negative");

        let Err(ApiError::Validation(details)) = validator.finish() else {
            panic!("expected a validation error");
        };
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "bankName");
        assert_eq!(details[0].message, "bankName is required");
    }

    #[test]
    fn finish_passes_clean_requests() {
        assert!(Validator::new().finish().is_ok());
    }
}
