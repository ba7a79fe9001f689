//! Date parsing shared by stored records and request inputs.
//!
//! Instants are stored as RFC 3339 strings. Inputs additionally accept a bare
//! calendar date (`2024-12-01`), which is read as midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{Error, Result};

/// Parse an RFC 3339 instant or a `YYYY-MM-DD` date.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(date.and_time(NaiveTime::MIN).and_utc());
  }
  Err(Error::InvalidDate(s.to_owned()))
}

/// `#[serde(deserialize_with = "...")]` helpers built on [`parse_instant`].
pub mod lenient {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, de::Error as _};

  pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(d)?;
    super::parse_instant(&raw).map_err(D::Error::custom)
  }

  pub fn deserialize_option<'de, D>(
    d: D,
  ) -> Result<Option<DateTime<Utc>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    Option::<String>::deserialize(d)?
      .filter(|s| !s.trim().is_empty())
      .map(|s| super::parse_instant(&s).map_err(D::Error::custom))
      .transpose()
  }
}
