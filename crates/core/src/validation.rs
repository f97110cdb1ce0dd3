//! Input rules applied before values reach the catalog, directory or ledger.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Minimum username length.
pub const MIN_USERNAME_LEN: usize = 4;
/// Digits required in a phone number.
pub const PHONE_DIGITS: usize = 11;
/// Accepted seat capacities.
pub const SEAT_CAPACITY_RANGE: std::ops::RangeInclusive<u32> = 1..=20;
/// Accepted hourly rates in dollars.
pub const HOURLY_RATE_RANGE: std::ops::RangeInclusive<f64> = 1_000.0..=20_000.0;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

fn non_empty(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(trimmed)
    }
}

/// Trimmed username of at least four characters.
pub fn username(input: &str) -> Result<String, ValidationError> {
    let name = non_empty(input)?;
    if name.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    Ok(name.to_string())
}

/// Trimmed email in `local@domain.tld` shape.
pub fn email(input: &str) -> Result<String, ValidationError> {
    let email = non_empty(input)?;
    if email.len() < 4 || !EMAIL_RE.is_match(email) {
        return Err(ValidationError::Email);
    }
    Ok(email.to_string())
}

/// Digit-only phone number; separators are dropped before counting.
pub fn phone(input: &str) -> Result<String, ValidationError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != PHONE_DIGITS {
        return Err(ValidationError::Phone(digits.len()));
    }
    Ok(digits)
}

/// Departure or destination text; must not contain digits.
pub fn location(input: &str) -> Result<String, ValidationError> {
    let place = non_empty(input)?;
    if place.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::Location);
    }
    Ok(place.to_string())
}

/// Jet model name.
pub fn model(input: &str) -> Result<String, ValidationError> {
    non_empty(input).map(str::to_string)
}

/// Whole number parsed from text.
pub fn whole_number(input: &str) -> Result<u32, ValidationError> {
    let text = non_empty(input)?;
    text.parse::<u32>()
        .map_err(|_| ValidationError::Integer(text.to_string()))
}

/// Dollar amount parsed from text; a leading `$` and `,` separators are accepted.
pub fn amount(input: &str) -> Result<f64, ValidationError> {
    let text = non_empty(input)?;
    let cleaned: String = text
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::Amount(text.to_string())),
    }
}

/// Seat count within the accepted range.
pub fn seat_capacity(value: u32) -> Result<u32, ValidationError> {
    if SEAT_CAPACITY_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::SeatCapacity)
    }
}

/// Hourly rate within the accepted band.
pub fn hourly_rate(value: f64) -> Result<f64, ValidationError> {
    if HOURLY_RATE_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::HourlyRate)
    }
}

/// Positive flight duration.
pub fn duration(value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::Duration)
    } else {
        Ok(value)
    }
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn flight_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let text = non_empty(input)?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| ValidationError::Date(text.to_string()))
}
