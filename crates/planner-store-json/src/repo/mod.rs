//! Record repositories: domain operations over the JSON collections.
//!
//! Every mutation runs inside [`crate::FileDb::modify`], so the check and the
//! write of one operation see the same state of their collection. Operations
//! that span collections (cascading deletes) are separate cycles and are not
//! atomic.
//!
//! Cross-repository dependencies are injected as capabilities rather than
//! concrete types: a course repository only needs to count assignments and
//! drop notes, and an assignment repository only needs to drop notes.

use std::future::Future;

use uuid::Uuid;

use crate::Result;

mod assignments;
mod courses;
mod notes;

pub use assignments::AssignmentRepo;
pub use courses::CourseRepo;
pub use notes::NoteRepo;

pub const ASSIGNMENTS: &str = "assignments";
pub const COURSES: &str = "courses";
pub const NOTES: &str = "notes";

fn new_id() -> String { Uuid::new_v4().to_string() }

/// Counting the assignments that reference a course.
pub trait AssignmentLookup: Send + Sync {
  fn count_for_course<'a>(
    &'a self,
    course_id: &'a str,
  ) -> impl Future<Output = Result<usize>> + Send + 'a;
}

/// Removing the notes attached to a deleted parent.
///
/// Both methods return the number of notes removed and leave the collection
/// file untouched when there was nothing to remove.
pub trait NoteCascade: Send + Sync {
  fn delete_for_assignment<'a>(
    &'a self,
    assignment_id: &'a str,
  ) -> impl Future<Output = Result<usize>> + Send + 'a;

  fn delete_for_course<'a>(
    &'a self,
    course_id: &'a str,
  ) -> impl Future<Output = Result<usize>> + Send + 'a;
}
