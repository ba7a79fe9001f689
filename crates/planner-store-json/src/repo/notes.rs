use std::collections::BTreeSet;

use chrono::Utc;
use planner_core::{
  RecordKind,
  note::{NewNote, Note, NotePatch, NoteQuery},
};
use tracing::info;

use super::{NOTES, NoteCascade, new_id};
use crate::{Change, FileDb, Result};

#[derive(Clone)]
pub struct NoteRepo {
  db: FileDb,
}

impl NoteRepo {
  pub fn new(db: FileDb) -> Self { Self { db } }

  /// Notes matching `query`, in insertion order.
  pub async fn list(&self, query: &NoteQuery) -> Result<Vec<Note>> {
    let notes: Vec<Note> = self.db.read_all(NOTES).await?;
    Ok(notes.into_iter().filter(|n| query.matches(n)).collect())
  }

  pub async fn get(&self, id: &str) -> Result<Option<Note>> {
    let notes: Vec<Note> = self.db.read_all(NOTES).await?;
    Ok(notes.into_iter().find(|n| n.id == id))
  }

  pub async fn create(&self, input: NewNote) -> Result<Note> {
    input.validate()?;
    let note = Note::from_new(new_id(), input, Utc::now());
    let note = self
      .db
      .modify(NOTES, move |notes: &mut Vec<Note>| {
        notes.push(note.clone());
        Ok(Change::Write(note))
      })
      .await?;
    info!(note_id = %note.id, "created note");
    Ok(note)
  }

  pub async fn update(&self, id: &str, patch: NotePatch) -> Result<Note> {
    patch.validate()?;
    let note = self
      .db
      .modify(NOTES, |notes: &mut Vec<Note>| {
        let note = notes
          .iter_mut()
          .find(|n| n.id == id)
          .ok_or_else(|| planner_core::Error::not_found(RecordKind::Note, id))?;
        patch.apply(note, Utc::now());
        Ok(Change::Write(note.clone()))
      })
      .await?;
    info!(note_id = id, "updated note");
    Ok(note)
  }

  pub async fn delete(&self, id: &str) -> Result<()> {
    let removed = self.delete_where(|n| n.id == id).await?;
    if removed == 0 {
      return Err(planner_core::Error::not_found(RecordKind::Note, id).into());
    }
    info!(note_id = id, "deleted note");
    Ok(())
  }

  /// Every tag in use, sorted and deduplicated.
  pub async fn tags(&self) -> Result<Vec<String>> {
    let notes: Vec<Note> = self.db.read_all(NOTES).await?;
    let tags: BTreeSet<String> = notes.into_iter().flat_map(|n| n.tags).collect();
    Ok(tags.into_iter().collect())
  }

  async fn delete_where<P>(&self, pred: P) -> Result<usize>
  where
    P: Fn(&Note) -> bool + Send,
  {
    self
      .db
      .modify(NOTES, move |notes: &mut Vec<Note>| {
        let before = notes.len();
        notes.retain(|n| !pred(n));
        let removed = before - notes.len();
        Ok(if removed == 0 {
          Change::Keep(0)
        } else {
          Change::Write(removed)
        })
      })
      .await
  }
}

impl NoteCascade for NoteRepo {
  async fn delete_for_assignment(&self, assignment_id: &str) -> Result<usize> {
    self
      .delete_where(|n| n.assignment_id.as_deref() == Some(assignment_id))
      .await
  }

  async fn delete_for_course(&self, course_id: &str) -> Result<usize> {
    self
      .delete_where(|n| n.course_id.as_deref() == Some(course_id))
      .await
  }
}
