//! [`JsonStore`], the JSON-file implementation of [`PlannerStore`].

use planner_core::{
  assignment::{Assignment, AssignmentPatch, AssignmentQuery, NewAssignment},
  course::{Course, CoursePatch, CourseQuery, NewCourse, Semester},
  note::{NewNote, Note, NotePatch, NoteQuery},
  store::PlannerStore,
};

use crate::{
  DataPaths, Error, FileDb, Result,
  repo::{AssignmentRepo, CourseRepo, NoteRepo},
};

pub type Assignments = AssignmentRepo<NoteRepo>;
pub type Courses = CourseRepo<Assignments, NoteRepo>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A study planner store backed by a directory of JSON files.
///
/// Cloning is cheap; clones share one [`FileDb`] and its write queues.
#[derive(Clone)]
pub struct JsonStore {
  db:          FileDb,
  courses:     Courses,
  assignments: Assignments,
  notes:       NoteRepo,
}

impl JsonStore {
  /// Open (or create) the data directory described by `paths`.
  pub async fn open(paths: DataPaths) -> Result<Self> {
    Ok(Self::with_db(FileDb::open(paths).await?))
  }

  pub fn with_db(db: FileDb) -> Self {
    let notes = NoteRepo::new(db.clone());
    let assignments = AssignmentRepo::new(db.clone(), notes.clone());
    let courses = CourseRepo::new(db.clone(), assignments.clone(), notes.clone());
    Self { db, courses, assignments, notes }
  }

  pub fn db(&self) -> &FileDb { &self.db }

  pub fn courses(&self) -> &Courses { &self.courses }

  pub fn assignments(&self) -> &Assignments { &self.assignments }

  pub fn notes(&self) -> &NoteRepo { &self.notes }
}

// ─── PlannerStore impl ───────────────────────────────────────────────────────

impl PlannerStore for JsonStore {
  type Error = Error;

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self, query: CourseQuery) -> Result<Vec<Course>> {
    self.courses.list(&query).await
  }

  async fn get_course(&self, id: &str) -> Result<Option<Course>> {
    self.courses.get(id).await
  }

  async fn find_course_by_code(
    &self,
    code: &str,
    semester: Semester,
    year: i32,
  ) -> Result<Option<Course>> {
    self.courses.find_by_code(code, semester, year).await
  }

  async fn create_course(&self, input: NewCourse) -> Result<Course> {
    self.courses.create(input).await
  }

  async fn update_course(&self, id: &str, patch: CoursePatch) -> Result<Course> {
    self.courses.update(id, patch).await
  }

  async fn delete_course(&self, id: &str) -> Result<()> {
    self.courses.delete(id).await
  }

  async fn semesters(&self) -> Result<Vec<Semester>> {
    self.courses.semesters().await
  }

  async fn years(&self) -> Result<Vec<i32>> {
    self.courses.years().await
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn list_assignments(&self, query: AssignmentQuery) -> Result<Vec<Assignment>> {
    self.assignments.list(&query).await
  }

  async fn get_assignment(&self, id: &str) -> Result<Option<Assignment>> {
    self.assignments.get(id).await
  }

  async fn create_assignment(&self, input: NewAssignment) -> Result<Assignment> {
    self.assignments.create(input).await
  }

  async fn update_assignment(&self, id: &str, patch: AssignmentPatch) -> Result<Assignment> {
    self.assignments.update(id, patch).await
  }

  async fn delete_assignment(&self, id: &str) -> Result<()> {
    self.assignments.delete(id).await
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn list_notes(&self, query: NoteQuery) -> Result<Vec<Note>> {
    self.notes.list(&query).await
  }

  async fn get_note(&self, id: &str) -> Result<Option<Note>> {
    self.notes.get(id).await
  }

  async fn create_note(&self, input: NewNote) -> Result<Note> {
    self.notes.create(input).await
  }

  async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Note> {
    self.notes.update(id, patch).await
  }

  async fn delete_note(&self, id: &str) -> Result<()> {
    self.notes.delete(id).await
  }

  async fn note_tags(&self) -> Result<Vec<String>> {
    self.notes.tags().await
  }
}
