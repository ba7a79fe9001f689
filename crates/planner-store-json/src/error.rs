//! Error type for `planner-store-json`.

use std::path::{Path, PathBuf};

use planner_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] planner_core::Error),

  /// The collection file exists but does not hold a JSON array of records.
  /// The file is left in place for inspection.
  #[error("collection {name:?} is corrupt ({}): {reason}", path.display())]
  CorruptCollection {
    name:   String,
    path:   PathBuf,
    reason: String,
  },

  #[error("i/o error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("write task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

impl Error {
  pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
    move |source| Self::Io { path: path.to_path_buf(), source }
  }

  pub(crate) fn corrupt(name: &str, path: &Path, reason: impl Into<String>) -> Self {
    Self::CorruptCollection {
      name:   name.to_owned(),
      path:   path.to_path_buf(),
      reason: reason.into(),
    }
  }
}

impl StoreError for Error {
  fn domain(&self) -> Option<&planner_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
