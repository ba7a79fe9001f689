//! The `PlannerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `planner-store-json`).
//! The REST layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  assignment::{Assignment, AssignmentPatch, AssignmentQuery, NewAssignment},
  course::{Course, CoursePatch, CourseQuery, NewCourse, Semester},
  note::{NewNote, Note, NotePatch, NoteQuery},
};

/// Backend errors that may wrap a domain [`crate::Error`].
///
/// Transport layers use [`StoreError::domain`] to tell a missing record or a
/// refused write apart from an infrastructure failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&crate::Error>;
}

/// Abstraction over a study planner storage backend.
///
/// Reads return `Option` for a missing id; updates and deletes of a missing
/// id fail with [`crate::Error::NotFound`]. Uniqueness and referential
/// integrity are checked against the latest state before anything is
/// written, so a refused operation leaves the store untouched.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait PlannerStore: Send + Sync {
  type Error: StoreError;

  // ── Courses ───────────────────────────────────────────────────────────

  fn list_courses(
    &self,
    query: CourseQuery,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  fn get_course<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + 'a;

  /// Look a course up by its `(code, semester, year)` key.
  fn find_course_by_code<'a>(
    &'a self,
    code: &'a str,
    semester: Semester,
    year: i32,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + 'a;

  /// Fails with [`crate::Error::DuplicateKey`] if the key is taken.
  fn create_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  fn update_course<'a>(
    &'a self,
    id: &'a str,
    patch: CoursePatch,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + 'a;

  /// Refused with [`crate::Error::ReferentialIntegrity`] while any
  /// assignment references the course. Notes attached to the course are
  /// deleted afterwards.
  fn delete_course<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Distinct semesters in use, in calendar order.
  fn semesters(&self) -> impl Future<Output = Result<Vec<Semester>, Self::Error>> + Send + '_;

  /// Distinct years in use, most recent first.
  fn years(&self) -> impl Future<Output = Result<Vec<i32>, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  fn list_assignments(
    &self,
    query: AssignmentQuery,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  fn get_assignment<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + 'a;

  fn create_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  fn update_assignment<'a>(
    &'a self,
    id: &'a str,
    patch: AssignmentPatch,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + 'a;

  /// Also deletes the notes attached to the assignment.
  fn delete_assignment<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Notes ─────────────────────────────────────────────────────────────

  fn list_notes(
    &self,
    query: NoteQuery,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  fn get_note<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + 'a;

  fn create_note(
    &self,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  fn update_note<'a>(
    &'a self,
    id: &'a str,
    patch: NotePatch,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + 'a;

  fn delete_note<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Distinct tags across all notes, sorted.
  fn note_tags(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
