//! Handlers for `/notes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/notes` | Optional `?courseId`, `assignmentId`, `tags=a,b`, `search` |
//! | `GET`    | `/notes/tags` | Every tag in use, sorted |
//! | `GET`    | `/notes/assignment/{assignment_id}` | Notes attached to one assignment |
//! | `POST`   | `/notes` | Body: [`NewNote`]; returns 201 |
//! | `GET`    | `/notes/{id}` | 404 if not found |
//! | `PUT`    | `/notes/{id}` | Body: [`NotePatch`] |
//! | `DELETE` | `/notes/{id}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use planner_core::{
  note::{NewNote, Note, NotePatch, NoteQuery},
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
  pub course_id:     Option<String>,
  pub assignment_id: Option<String>,
  /// Comma-separated; a note matches if it carries any of them.
  pub tags:          Option<String>,
  pub search:        Option<String>,
}

impl From<ListParams> for NoteQuery {
  fn from(p: ListParams) -> Self {
    let tags = p
      .tags
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_owned)
      .collect();
    Self {
      course_id: p.course_id.filter(|s| !s.is_empty()),
      assignment_id: p.assignment_id.filter(|s| !s.is_empty()),
      tags,
      text: p.search.filter(|s| !s.is_empty()),
    }
  }
}

/// `GET /notes[?courseId=...][&assignmentId=...][&tags=a,b][&search=...]`
pub async fn list<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Params(params): Params<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError> {
  let notes = store
    .list_notes(params.into())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(notes))
}

/// `GET /notes/assignment/{assignment_id}`
pub async fn for_assignment<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(assignment_id): Path<String>,
) -> Result<Json<Vec<Note>>, ApiError> {
  let query = NoteQuery {
    assignment_id: Some(assignment_id),
    ..Default::default()
  };
  let notes = store.list_notes(query).await.map_err(ApiError::store)?;
  Ok(Json(notes))
}

/// `GET /notes/tags`
pub async fn tags<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(store.note_tags().await.map_err(ApiError::store)?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /notes`
pub async fn create<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Body(input): Body<NewNote>,
) -> Result<impl IntoResponse, ApiError> {
  let note = store.create_note(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /notes/{id}`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
  let note = store
    .get_note(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("note not found: {id}")))?;
  Ok(Json(note))
}

/// `PUT /notes/{id}`
pub async fn update<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Body(patch): Body<NotePatch>,
) -> Result<Json<Note>, ApiError> {
  let note = store.update_note(&id, patch).await.map_err(ApiError::store)?;
  Ok(Json(note))
}

/// `DELETE /notes/{id}`
pub async fn delete<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  store.delete_note(&id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
