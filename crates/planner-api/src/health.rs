//! Liveness probe at `GET /health`.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:    &'static str,
  pub timestamp: DateTime<Utc>,
  pub version:   &'static str,
}

/// `GET /health`
pub async fn handler() -> Json<Health> {
  Json(Health {
    status:    "OK",
    timestamp: Utc::now(),
    version:   env!("CARGO_PKG_VERSION"),
  })
}
