//! Summary of all three collections at `GET /dashboard`.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use planner_core::{dashboard::Dashboard, store::PlannerStore};

use crate::error::ApiError;

/// `GET /dashboard`
pub async fn handler<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Dashboard>, ApiError> {
  let (courses, assignments, notes) = tokio::try_join!(
    store.list_courses(Default::default()),
    store.list_assignments(Default::default()),
    store.list_notes(Default::default()),
  )
  .map_err(ApiError::store)?;

  Ok(Json(Dashboard::compute(
    courses,
    &assignments,
    &notes,
    Utc::now(),
  )))
}
