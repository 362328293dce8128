//! Named format predicates.
//!
//! Each predicate is a pure `&str -> bool` function. [`Format::check`] dispatches on the
//! variant; any non-string JSON value fails every format.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;

use super::masks::decode_base64;
use crate::models::TaskStatus;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$").unwrap();
    static ref NAME_REGEX: Regex = Regex::new(r"(?i)^[ A-Za-zÑñÁáÉéÍíÓóÚúÜü]+$").unwrap();
    static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Passwords must decode to more than this many characters.
pub const PASSWORD_MIN_EXCLUSIVE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Name,
    Date,
    TaskStatus,
    /// A base64-encoded password.
    Password,
}

impl Format {
    pub fn check(self, value: &Value) -> bool {
        let Some(text) = value.as_str() else {
            return false;
        };
        match self {
            Format::Email => is_email(text),
            Format::Name => is_name(text),
            Format::Date => is_date(text),
            Format::TaskStatus => is_task_status(text),
            Format::Password => is_password(text),
        }
    }
}

pub fn is_email(text: &str) -> bool {
    EMAIL_REGEX.is_match(text)
}

/// Letters, spaces and the Spanish diacritics.
pub fn is_name(text: &str) -> bool {
    NAME_REGEX.is_match(text)
}

/// Strict `YYYY-MM-DD` that names a real calendar day (`2024-02-30` is rejected).
pub fn is_date(text: &str) -> bool {
    DATE_REGEX.is_match(text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

pub fn is_task_status(text: &str) -> bool {
    TaskStatus::from_str(text).is_ok()
}

pub fn is_password(encoded: &str) -> bool {
    decode_base64(encoded)
        .map(|password| password.chars().count() > PASSWORD_MIN_EXCLUSIVE)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_date_format() {
        assert!(is_date("2024-11-21"));
        assert!(is_date("2024-02-29"));
        assert!(!is_date("21-11-2024"));
        assert!(!is_date("2024-02-30"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("2024-1-05"));
        assert!(!is_date("2024-11-21T00:00:00Z"));
    }

    #[test]
    fn test_email_format() {
        assert!(is_email("test@example.com"));
        assert!(is_email("John.Doe+tag@Mail.Example.ORG"));
        assert!(!is_email("test@.com"));
        assert!(!is_email("testexample.com"));
        assert!(!is_email("test@example.c"));
    }

    #[test]
    fn test_name_format() {
        assert!(is_name("John Doe"));
        assert!(is_name("José Ñúñez"));
        assert!(!is_name("John123"));
        assert!(!is_name(""));
    }

    #[test]
    fn test_task_status_format() {
        assert!(is_task_status("pending"));
        assert!(is_task_status("in-progress"));
        assert!(is_task_status("completed"));
        assert!(!is_task_status("INVALID_STATUS"));
        assert!(!is_task_status("Pending"));
    }

    #[test]
    fn test_password_format() {
        // "password123"
        assert!(is_password("cGFzc3dvcmQxMjM="));
        // "pass"
        assert!(!is_password("cGFzcw=="));
        // "secret" is exactly six characters
        assert!(!is_password("c2VjcmV0"));
        assert!(!is_password("not base64 at all!"));
        assert!(!is_password(""));
    }

    #[test]
    fn test_non_string_values_fail_every_format() {
        for format in [
            Format::Email,
            Format::Name,
            Format::Date,
            Format::TaskStatus,
            Format::Password,
        ] {
            assert!(!format.check(&json!(42)));
            assert!(!format.check(&json!(["pending"])));
        }
        assert!(Format::Email.check(&json!("test@example.com")));
    }
}
