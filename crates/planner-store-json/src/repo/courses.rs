use std::collections::BTreeSet;

use planner_core::{
  RecordKind,
  course::{Course, CoursePatch, CourseQuery, NewCourse, Semester},
};
use tracing::{info, warn};

use super::{AssignmentLookup, COURSES, NoteCascade, new_id};
use crate::{Change, FileDb, Result};

/// Courses, unique by `(code, semester, year)`.
///
/// `A` answers whether assignments still reference a course; `N` removes the
/// notes of a deleted course.
#[derive(Clone)]
pub struct CourseRepo<A, N> {
  db:          FileDb,
  assignments: A,
  notes:       N,
}

impl<A: AssignmentLookup, N: NoteCascade> CourseRepo<A, N> {
  pub fn new(db: FileDb, assignments: A, notes: N) -> Self {
    Self { db, assignments, notes }
  }

  /// Courses matching `query`, in insertion order.
  pub async fn list(&self, query: &CourseQuery) -> Result<Vec<Course>> {
    let courses: Vec<Course> = self.db.read_all(COURSES).await?;
    Ok(courses.into_iter().filter(|c| query.matches(c)).collect())
  }

  pub async fn get(&self, id: &str) -> Result<Option<Course>> {
    let courses: Vec<Course> = self.db.read_all(COURSES).await?;
    Ok(courses.into_iter().find(|c| c.id == id))
  }

  pub async fn find_by_code(
    &self,
    code: &str,
    semester: Semester,
    year: i32,
  ) -> Result<Option<Course>> {
    let courses: Vec<Course> = self.db.read_all(COURSES).await?;
    Ok(courses.into_iter().find(|c| c.has_key(code, semester, year)))
  }

  pub async fn create(&self, input: NewCourse) -> Result<Course> {
    input.validate()?;
    let course = Course::from_new(new_id(), input);
    let course = self
      .db
      .modify(COURSES, move |courses: &mut Vec<Course>| {
        ensure_key_free(courses, &course)?;
        courses.push(course.clone());
        Ok(Change::Write(course))
      })
      .await?;
    info!(course_id = %course.id, code = %course.code, "created course");
    Ok(course)
  }

  pub async fn update(&self, id: &str, patch: CoursePatch) -> Result<Course> {
    patch.validate()?;
    let course = self
      .db
      .modify(COURSES, |courses: &mut Vec<Course>| {
        let index = courses
          .iter()
          .position(|c| c.id == id)
          .ok_or_else(|| planner_core::Error::not_found(RecordKind::Course, id))?;
        let touches_key = patch.touches_key();
        let mut course = courses[index].clone();
        patch.apply(&mut course);
        if touches_key {
          ensure_key_free(courses, &course)?;
        }
        courses[index] = course.clone();
        Ok(Change::Write(course))
      })
      .await?;
    info!(course_id = id, "updated course");
    Ok(course)
  }

  /// Remove a course that no assignment references, then its notes.
  pub async fn delete(&self, id: &str) -> Result<()> {
    if self.get(id).await?.is_none() {
      return Err(planner_core::Error::not_found(RecordKind::Course, id).into());
    }
    if self.assignments.count_for_course(id).await? > 0 {
      return Err(
        planner_core::Error::ReferentialIntegrity(
          "cannot delete course with existing assignments".to_owned(),
        )
        .into(),
      );
    }

    self
      .db
      .modify(COURSES, |courses: &mut Vec<Course>| {
        let before = courses.len();
        courses.retain(|c| c.id != id);
        if courses.len() == before {
          return Err(planner_core::Error::not_found(RecordKind::Course, id).into());
        }
        Ok(Change::Write(()))
      })
      .await?;
    info!(course_id = id, "deleted course");

    let removed = self
      .notes
      .delete_for_course(id)
      .await
      .inspect_err(|e| warn!(course_id = id, error = %e, "failed to delete notes of course"))?;
    if removed > 0 {
      info!(course_id = id, notes = removed, "deleted notes of course");
    }
    Ok(())
  }

  /// Semesters in use, in calendar order.
  pub async fn semesters(&self) -> Result<Vec<Semester>> {
    let courses: Vec<Course> = self.db.read_all(COURSES).await?;
    let semesters: BTreeSet<Semester> = courses.iter().map(|c| c.semester).collect();
    Ok(semesters.into_iter().collect())
  }

  /// Years in use, most recent first.
  pub async fn years(&self) -> Result<Vec<i32>> {
    let courses: Vec<Course> = self.db.read_all(COURSES).await?;
    let years: BTreeSet<i32> = courses.iter().map(|c| c.year).collect();
    Ok(years.into_iter().rev().collect())
  }
}

/// Fail if a course other than `course` already holds its key.
fn ensure_key_free(courses: &[Course], course: &Course) -> planner_core::Result<()> {
  let (code, semester, year) = (&course.code, course.semester, course.year);
  if courses
    .iter()
    .any(|c| c.id != course.id && c.has_key(code, semester, year))
  {
    return Err(planner_core::Error::DuplicateKey(format!(
      "course with code {code} already exists for {semester} {year}"
    )));
  }
  Ok(())
}
