use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::error::ApiError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

// Request fields are Option so an absent field lands here as a field-level
// validation error instead of a deserializer rejection.

fn missing(field: &'static str) -> ApiError {
    ApiError::validation(field, "is required")
}

/// Present field, passed through untouched (passwords must not be trimmed).
pub fn present<'a>(field: &'static str, raw: Option<&'a str>) -> Result<&'a str, ApiError> {
    raw.ok_or_else(|| missing(field))
}

/// Present, non-empty text field, trimmed.
pub fn required(field: &'static str, raw: Option<&str>) -> Result<String, ApiError> {
    let value = present(field, raw)?.trim();
    if value.is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Normalized (trimmed, lowercased) email with a syntax check.
pub fn email(raw: Option<&str>) -> Result<String, ApiError> {
    let value = present("email", raw)?.trim().to_lowercase();
    if !EMAIL_RE.is_match(&value) {
        return Err(ApiError::validation("email", "not a valid email address"));
    }
    Ok(value)
}

pub fn phone_number(raw: Option<&str>) -> Result<String, ApiError> {
    let value = present("phone_number", raw)?.trim();
    if !PHONE_RE.is_match(value) {
        return Err(ApiError::validation(
            "phone_number",
            "not a valid phone number",
        ));
    }
    Ok(value.to_string())
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn date_of_birth(raw: Option<&str>) -> Result<Date, ApiError> {
    let value = present("date_of_birth", raw)?.trim();
    Date::parse(value, DATE_FORMAT)
        .map_err(|_| ApiError::validation("date_of_birth", "expected YYYY-MM-DD"))
}

pub fn password(raw: Option<&str>) -> Result<&str, ApiError> {
    let value = present("password", raw)?;
    if value.len() < 8 {
        return Err(ApiError::validation(
            "password",
            "must be at least 8 characters",
        ));
    }
    Ok(value)
}
