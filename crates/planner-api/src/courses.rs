//! Handlers for `/courses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/courses` | Optional `?semester`, `year`, `search` |
//! | `POST`   | `/courses` | Body: [`NewCourse`]; 201, or 409 if the code is taken that term |
//! | `GET`    | `/courses/meta/semesters` | Semesters in use |
//! | `GET`    | `/courses/meta/years` | Years in use, newest first |
//! | `GET`    | `/courses/{id}` | 404 if not found |
//! | `PUT`    | `/courses/{id}` | Body: [`CoursePatch`] |
//! | `DELETE` | `/courses/{id}` | 204; 409 while assignments reference it |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use planner_core::{
  course::{Course, CoursePatch, CourseQuery, NewCourse, Semester},
  store::PlannerStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{Body, Params},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub semester: Option<Semester>,
  pub year:     Option<i32>,
  /// Case-insensitive match over name, code and instructor.
  pub search:   Option<String>,
}

impl From<ListParams> for CourseQuery {
  fn from(p: ListParams) -> Self {
    Self {
      semester: p.semester,
      year:     p.year,
      text:     p.search.filter(|s| !s.is_empty()),
    }
  }
}

/// `GET /courses[?semester=Fall][&year=2024][&search=...]`
pub async fn list<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Params(params): Params<ListParams>,
) -> Result<Json<Vec<Course>>, ApiError> {
  let courses = store
    .list_courses(params.into())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(courses))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /courses`
pub async fn create<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Body(input): Body<NewCourse>,
) -> Result<impl IntoResponse, ApiError> {
  let course = store.create_course(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(course)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /courses/{id}`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
  let course = store
    .get_course(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("course not found: {id}")))?;
  Ok(Json(course))
}

/// `PUT /courses/{id}`
pub async fn update<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Body(patch): Body<CoursePatch>,
) -> Result<Json<Course>, ApiError> {
  let course = store
    .update_course(&id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(course))
}

/// `DELETE /courses/{id}`
pub async fn delete<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store.delete_course(&id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Meta ─────────────────────────────────────────────────────────────────────

/// `GET /courses/meta/semesters`
pub async fn semesters<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Semester>>, ApiError> {
  Ok(Json(store.semesters().await.map_err(ApiError::store)?))
}

/// `GET /courses/meta/years`
pub async fn years<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<i32>>, ApiError> {
  Ok(Json(store.years().await.map_err(ApiError::store)?))
}
