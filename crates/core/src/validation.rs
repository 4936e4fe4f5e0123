//! Input validation utilities.
//!
//! These run before any store is touched so that a rejected call leaves every
//! repository exactly as it was.

use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::{ClinicError, ClinicResult};
use chrono::{NaiveDate, NaiveTime};
use clinic_types::NonEmptyText;

/// Wraps a mandatory text field, naming the field in the error.
pub(crate) fn required_text(field: &str, value: impl AsRef<str>) -> ClinicResult<NonEmptyText> {
    NonEmptyText::new(value)
        .map_err(|_| ClinicError::InvalidInput(format!("{field} cannot be empty")))
}

/// Normalises an optional free-text field: whitespace-only input becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `ClinicError::InvalidInput` if the text is not a real calendar date.
pub fn validate_date(date: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
        ClinicError::InvalidInput(format!("'{date}' is not a valid YYYY-MM-DD date"))
    })
}

/// Validates a monetary amount: finite and not negative.
pub(crate) fn validate_amount(field: &str, amount: f64) -> ClinicResult<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ClinicError::InvalidInput(format!(
            "{field} must be a non-negative amount, got {amount}"
        )));
    }
    Ok(amount)
}

/// Parses an `HH:MM-HH:MM` time slot into its start and end times.
///
/// Booking does not require this shape; callers that build slots from user input can
/// use it to reject malformed text early.
///
/// # Errors
///
/// Returns `ClinicError::InvalidInput` if either half fails to parse or the slot does
/// not end after it starts.
pub fn parse_time_slot(slot: &str) -> ClinicResult<(NaiveTime, NaiveTime)> {
    let invalid = || ClinicError::InvalidInput(format!("'{slot}' is not an HH:MM-HH:MM slot"));

    let (start, end) = slot.trim().split_once('-').ok_or_else(invalid)?;
    let start = NaiveTime::parse_from_str(start.trim(), TIME_FORMAT).map_err(|_| invalid())?;
    let end = NaiveTime::parse_from_str(end.trim(), TIME_FORMAT).map_err(|_| invalid())?;

    if end <= start {
        return Err(ClinicError::InvalidInput(format!(
            "slot '{slot}' must end after it starts"
        )));
    }

    Ok((start, end))
}
