//! Field rules applied to inputs before any write is attempted.

use crate::{Error, Result};

pub(crate) fn length(field: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
  let len = value.chars().count();
  if len < min {
    return Err(if min == 1 {
      Error::validation(field, "is required")
    } else {
      Error::validation(field, format!("must be at least {min} characters"))
    });
  }
  if len > max {
    return Err(Error::validation(
      field,
      format!("must be at most {max} characters"),
    ));
  }
  Ok(())
}

pub(crate) fn optional_length(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
  match value {
    Some(v) => length(field, v, 0, max),
    None => Ok(()),
  }
}

/// Letters, digits, hyphens and spaces.
pub(crate) fn course_code(field: &'static str, value: &str) -> Result<()> {
  length(field, value, 1, 20)?;
  if !value
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
  {
    return Err(Error::validation(
      field,
      "may only contain letters, numbers, hyphens, and spaces",
    ));
  }
  Ok(())
}

/// `#RRGGBB`.
pub(crate) fn hex_color(field: &'static str, value: &str) -> Result<()> {
  let valid = value.len() == 7
    && value.starts_with('#')
    && value[1..].chars().all(|c| c.is_ascii_hexdigit());
  if !valid {
    return Err(Error::validation(
      field,
      "must be a hex color such as #FF5733",
    ));
  }
  Ok(())
}

pub(crate) const MIN_YEAR: i32 = 2020;
pub(crate) const MAX_YEAR: i32 = 2030;

pub(crate) fn year(field: &'static str, value: i32) -> Result<()> {
  if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
    return Err(Error::validation(
      field,
      format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
    ));
  }
  Ok(())
}

pub(crate) const MAX_TAGS: usize = 10;

pub(crate) fn tags(field: &'static str, tags: &[String]) -> Result<()> {
  if tags.len() > MAX_TAGS {
    return Err(Error::validation(
      field,
      format!("at most {MAX_TAGS} tags are allowed"),
    ));
  }
  for tag in tags {
    length(field, tag, 1, 50)?;
  }
  Ok(())
}
