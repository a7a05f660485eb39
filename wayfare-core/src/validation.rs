//! Field checks shared by the request and auth handlers. The messages are
//! part of the public API and clients match on them verbatim.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::{CoreError, CoreResult};

pub const INVALID_DATES: &str = "Invalid Date Parameters";
pub const RETURN_DATE_REQUIRED: &str = "The returnDate field is required.";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"));

pub fn required_message(field: &str) -> String {
    format!("The \"{}\" field is required", field)
}

/// Returns the trimmed value, or the "field is required" error when the
/// value is absent or blank.
pub fn required<'a>(value: &'a Option<String>, field: &str) -> CoreResult<&'a str> {
    provided(value).ok_or_else(|| CoreError::Validation(required_message(field)))
}

/// Blank strings are treated the same as a missing key.
pub fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(INVALID_DATES.to_string()))
}

/// A return date earlier than the flight date is rejected; same-day returns are fine.
pub fn check_date_order(flight_date: NaiveDate, return_date: Option<NaiveDate>) -> CoreResult<()> {
    match return_date {
        Some(ret) if ret < flight_date => Err(CoreError::Validation(INVALID_DATES.to_string())),
        _ => Ok(()),
    }
}

pub fn parse_uuid_field(value: &str, field: &str) -> CoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| CoreError::Validation(format!("The \"{}\" field must be a valid UUID", field)))
}

pub fn check_email(email: &str) -> CoreResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(CoreError::Validation(INVALID_EMAIL.to_string()))
    }
}

pub fn check_password(password: &str) -> CoreResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(PASSWORD_TOO_SHORT.to_string()));
    }
    Ok(())
}
