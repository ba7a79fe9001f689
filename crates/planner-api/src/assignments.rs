//! Handlers for `/assignments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assignments` | Optional `?courseId`, `status`, `priority`, `startDate`, `endDate`, `search` |
//! | `GET`    | `/assignments/overdue` | Open assignments past due, as of now |
//! | `POST`   | `/assignments` | Body: [`NewAssignment`]; returns 201 |
//! | `GET`    | `/assignments/{id}` | 404 if not found |
//! | `PUT`    | `/assignments/{id}` | Body: [`AssignmentPatch`] |
//! | `DELETE` | `/assignments/{id}` | 204; also deletes the assignment's notes |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use planner_core::{
  assignment::{
    Assignment, AssignmentPatch, AssignmentQuery, AssignmentStatus, NewAssignment, Priority,
  },
  date::parse_instant,
  store::PlannerStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{Body, Params},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub course_id:  Option<String>,
  pub status:     Option<AssignmentStatus>,
  pub priority:   Option<Priority>,
  /// Inclusive lower bound on the due date; RFC 3339 or `YYYY-MM-DD`.
  pub start_date: Option<String>,
  /// Inclusive upper bound on the due date.
  pub end_date:   Option<String>,
  pub search:     Option<String>,
}

impl TryFrom<ListParams> for AssignmentQuery {
  type Error = planner_core::Error;

  fn try_from(p: ListParams) -> Result<Self, Self::Error> {
    let date = |s: Option<String>| {
      s.filter(|s| !s.trim().is_empty())
        .map(|s| parse_instant(&s))
        .transpose()
    };
    Ok(Self {
      course_id:  p.course_id.filter(|s| !s.is_empty()),
      status:     p.status,
      priority:   p.priority,
      due_after:  date(p.start_date)?,
      due_before: date(p.end_date)?,
      overdue_at: None,
      text:       p.search.filter(|s| !s.is_empty()),
    })
  }
}

/// `GET /assignments[?courseId=...][&status=...][&startDate=...][&endDate=...]`
pub async fn list<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Params(params): Params<ListParams>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
  let query = AssignmentQuery::try_from(params)?;
  let assignments = store
    .list_assignments(query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(assignments))
}

/// `GET /assignments/overdue`
pub async fn overdue<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
  let mut assignments = store
    .list_assignments(AssignmentQuery::overdue(Utc::now()))
    .await
    .map_err(ApiError::store)?;
  assignments.sort_by_key(|a| a.due_date);
  Ok(Json(assignments))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /assignments`
pub async fn create<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Body(input): Body<NewAssignment>,
) -> Result<impl IntoResponse, ApiError> {
  let assignment = store
    .create_assignment(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /assignments/{id}`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Assignment>, ApiError> {
  let assignment = store
    .get_assignment(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("assignment not found: {id}")))?;
  Ok(Json(assignment))
}

/// `PUT /assignments/{id}`
pub async fn update<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Body(patch): Body<AssignmentPatch>,
) -> Result<Json<Assignment>, ApiError> {
  let assignment = store
    .update_assignment(&id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(assignment))
}

/// `DELETE /assignments/{id}`
pub async fn delete<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store.delete_assignment(&id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
