//! Error types for `planner-core`.

use thiserror::Error;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
  Assignment,
  Course,
  Note,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} not found: {id}")]
  NotFound { kind: RecordKind, id: String },

  /// A uniqueness rule would be broken by the write.
  #[error("{0}")]
  DuplicateKey(String),

  /// A delete was refused because other records still reference the target.
  #[error("{0}")]
  ReferentialIntegrity(String),

  #[error("invalid {field}: {message}")]
  Validation {
    field:   &'static str,
    message: String,
  },

  #[error("invalid date {0:?}: expected RFC 3339 or YYYY-MM-DD")]
  InvalidDate(String),
}

impl Error {
  pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }

  pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
    Self::Validation { field, message: message.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
