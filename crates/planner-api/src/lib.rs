//! JSON REST API for the study planner.
//!
//! Exposes an axum [`Router`] backed by any
//! [`planner_core::store::PlannerStore`]. CORS, static files and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", planner_api::api_router(store.clone()))
//! ```

pub mod assignments;
pub mod courses;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod health;
pub mod notes;

use std::sync::Arc;

use axum::{Router, routing::get};
use planner_core::store::PlannerStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PlannerStore + 'static,
{
  Router::new()
    .route("/health", get(health::handler))
    // Courses
    .route("/courses", get(courses::list::<S>).post(courses::create::<S>))
    .route("/courses/meta/semesters", get(courses::semesters::<S>))
    .route("/courses/meta/years", get(courses::years::<S>))
    .route(
      "/courses/{id}",
      get(courses::get_one::<S>)
        .put(courses::update::<S>)
        .delete(courses::delete::<S>),
    )
    // Assignments
    .route(
      "/assignments",
      get(assignments::list::<S>).post(assignments::create::<S>),
    )
    .route("/assignments/overdue", get(assignments::overdue::<S>))
    .route(
      "/assignments/{id}",
      get(assignments::get_one::<S>)
        .put(assignments::update::<S>)
        .delete(assignments::delete::<S>),
    )
    // Notes
    .route("/notes", get(notes::list::<S>).post(notes::create::<S>))
    .route("/notes/tags", get(notes::tags::<S>))
    .route(
      "/notes/assignment/{assignment_id}",
      get(notes::for_assignment::<S>),
    )
    .route(
      "/notes/{id}",
      get(notes::get_one::<S>)
        .put(notes::update::<S>)
        .delete(notes::delete::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(store)
}
