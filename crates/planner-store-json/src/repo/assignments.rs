use chrono::Utc;
use planner_core::{
  RecordKind,
  assignment::{Assignment, AssignmentPatch, AssignmentQuery, NewAssignment},
};
use tracing::{info, warn};

use super::{ASSIGNMENTS, AssignmentLookup, NoteCascade, new_id};
use crate::{Change, FileDb, Result};

/// Assignments, with notes removed through `N` when an assignment goes.
#[derive(Clone)]
pub struct AssignmentRepo<N> {
  db:    FileDb,
  notes: N,
}

impl<N: NoteCascade> AssignmentRepo<N> {
  pub fn new(db: FileDb, notes: N) -> Self { Self { db, notes } }

  /// Assignments matching `query`, in insertion order.
  pub async fn list(&self, query: &AssignmentQuery) -> Result<Vec<Assignment>> {
    let all: Vec<Assignment> = self.db.read_all(ASSIGNMENTS).await?;
    Ok(all.into_iter().filter(|a| query.matches(a)).collect())
  }

  pub async fn get(&self, id: &str) -> Result<Option<Assignment>> {
    let all: Vec<Assignment> = self.db.read_all(ASSIGNMENTS).await?;
    Ok(all.into_iter().find(|a| a.id == id))
  }

  pub async fn create(&self, input: NewAssignment) -> Result<Assignment> {
    input.validate()?;
    let assignment = Assignment::from_new(new_id(), input, Utc::now());
    let assignment = self
      .db
      .modify(ASSIGNMENTS, move |all: &mut Vec<Assignment>| {
        all.push(assignment.clone());
        Ok(Change::Write(assignment))
      })
      .await?;
    info!(
      assignment_id = %assignment.id,
      course_id = %assignment.course_id,
      "created assignment"
    );
    Ok(assignment)
  }

  pub async fn update(&self, id: &str, patch: AssignmentPatch) -> Result<Assignment> {
    patch.validate()?;
    let assignment = self
      .db
      .modify(ASSIGNMENTS, |all: &mut Vec<Assignment>| {
        let assignment = all
          .iter_mut()
          .find(|a| a.id == id)
          .ok_or_else(|| planner_core::Error::not_found(RecordKind::Assignment, id))?;
        patch.apply(assignment, Utc::now());
        Ok(Change::Write(assignment.clone()))
      })
      .await?;
    info!(assignment_id = id, "updated assignment");
    Ok(assignment)
  }

  /// Remove the assignment, then the notes attached to it.
  ///
  /// If removing the notes fails the assignment stays deleted and the error
  /// is returned.
  pub async fn delete(&self, id: &str) -> Result<()> {
    self
      .db
      .modify(ASSIGNMENTS, |all: &mut Vec<Assignment>| {
        let before = all.len();
        all.retain(|a| a.id != id);
        if all.len() == before {
          return Err(planner_core::Error::not_found(RecordKind::Assignment, id).into());
        }
        Ok(Change::Write(()))
      })
      .await?;
    info!(assignment_id = id, "deleted assignment");

    let removed = self
      .notes
      .delete_for_assignment(id)
      .await
      .inspect_err(|e| warn!(assignment_id = id, error = %e, "failed to delete notes of assignment"))?;
    if removed > 0 {
      info!(assignment_id = id, notes = removed, "deleted notes of assignment");
    }
    Ok(())
  }
}

impl<N: NoteCascade> AssignmentLookup for AssignmentRepo<N> {
  async fn count_for_course(&self, course_id: &str) -> Result<usize> {
    let all: Vec<Assignment> = self.db.read_all(ASSIGNMENTS).await?;
    Ok(all.iter().filter(|a| a.course_id == course_id).count())
  }
}
