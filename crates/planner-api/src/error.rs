//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use planner_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the domain error it wraps, if any.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.domain() {
      Some(domain) => Self::from_domain(domain),
      None => Self::Store(Box::new(e)),
    }
  }

  fn from_domain(e: &planner_core::Error) -> Self {
    use planner_core::Error as E;
    let message = e.to_string();
    match e {
      E::NotFound { .. } => Self::NotFound(message),
      E::DuplicateKey(_) | E::ReferentialIntegrity(_) => Self::Conflict(message),
      E::Validation { .. } | E::InvalidDate(_) => Self::BadRequest(message),
    }
  }
}

impl From<planner_core::Error> for ApiError {
  fn from(e: planner_core::Error) -> Self { Self::from_domain(&e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
