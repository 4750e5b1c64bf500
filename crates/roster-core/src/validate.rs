//! Per-field validators.
//!
//! Each rule lives in exactly one function here and is called both when an
//! instance is built and whenever the field is later reassigned.

use crate::error::ValidationError;

/// Earliest year a review may be filed for.
pub const MIN_REVIEW_YEAR: i64 = 2000;

/// Accept `value` if it has at least one non-whitespace character.
///
/// The value is returned as given; trimming only decides blankness.
pub fn non_blank(field: &'static str, value: String) -> Result<String, ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::Blank { field });
  }
  Ok(value)
}

pub fn name(value: String) -> Result<String, ValidationError> { non_blank("name", value) }

pub fn job_title(value: String) -> Result<String, ValidationError> {
  non_blank("job_title", value)
}

pub fn summary(value: String) -> Result<String, ValidationError> {
  non_blank("summary", value)
}

pub fn year(value: i64) -> Result<i64, ValidationError> {
  if value < MIN_REVIEW_YEAR {
    return Err(ValidationError::BelowMinimum {
      field: "year",
      min:   MIN_REVIEW_YEAR,
      value,
    });
  }
  Ok(value)
}
