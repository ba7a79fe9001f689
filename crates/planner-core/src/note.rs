//! Free-form study notes, optionally attached to a course and/or an
//! assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub id:            String,
  pub title:         String,
  pub content:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub course_id:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assignment_id: Option<String>,
  #[serde(default)]
  pub tags:          Vec<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Note {
  pub fn from_new(id: String, input: NewNote, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: input.title,
      content: input.content,
      course_id: input.course_id,
      assignment_id: input.assignment_id,
      tags: input.tags,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Input to [`crate::store::PlannerStore::create_note`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
  pub title:         String,
  pub content:       String,
  #[serde(default)]
  pub course_id:     Option<String>,
  #[serde(default)]
  pub assignment_id: Option<String>,
  #[serde(default)]
  pub tags:          Vec<String>,
}

impl NewNote {
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      content: content.into(),
      course_id: None,
      assignment_id: None,
      tags: Vec::new(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate::length("title", &self.title, 1, 200)?;
    validate::length("content", &self.content, 1, 10_000)?;
    if let Some(id) = &self.course_id {
      validate::length("courseId", id, 1, usize::MAX)?;
    }
    if let Some(id) = &self.assignment_id {
      validate::length("assignmentId", id, 1, usize::MAX)?;
    }
    validate::tags("tags", &self.tags)
  }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
  pub title:         Option<String>,
  pub content:       Option<String>,
  pub course_id:     Option<String>,
  pub assignment_id: Option<String>,
  pub tags:          Option<Vec<String>>,
}

impl NotePatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(title) = &self.title {
      validate::length("title", title, 1, 200)?;
    }
    if let Some(content) = &self.content {
      validate::length("content", content, 1, 10_000)?;
    }
    if let Some(id) = &self.course_id {
      validate::length("courseId", id, 1, usize::MAX)?;
    }
    if let Some(id) = &self.assignment_id {
      validate::length("assignmentId", id, 1, usize::MAX)?;
    }
    if let Some(tags) = &self.tags {
      validate::tags("tags", tags)?;
    }
    Ok(())
  }

  pub fn apply(self, note: &mut Note, now: DateTime<Utc>) {
    if let Some(title) = self.title {
      note.title = title;
    }
    if let Some(content) = self.content {
      note.content = content;
    }
    if let Some(course_id) = self.course_id {
      note.course_id = Some(course_id);
    }
    if let Some(assignment_id) = self.assignment_id {
      note.assignment_id = Some(assignment_id);
    }
    if let Some(tags) = self.tags {
      note.tags = tags;
    }
    note.updated_at = now;
  }
}

/// Parameters for [`crate::store::PlannerStore::list_notes`].
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
  pub course_id:     Option<String>,
  pub assignment_id: Option<String>,
  /// Keep notes carrying at least one of these tags.
  pub tags:          Vec<String>,
  /// Case-insensitive match over title, content and tags.
  pub text:          Option<String>,
}

impl NoteQuery {
  pub fn matches(&self, note: &Note) -> bool {
    if self
      .course_id
      .as_deref()
      .is_some_and(|c| note.course_id.as_deref() != Some(c))
    {
      return false;
    }
    if self
      .assignment_id
      .as_deref()
      .is_some_and(|a| note.assignment_id.as_deref() != Some(a))
    {
      return false;
    }
    if !self.tags.is_empty() && !self.tags.iter().any(|t| note.tags.contains(t)) {
      return false;
    }
    if let Some(text) = &self.text {
      let needle = text.to_lowercase();
      let hit = note.title.to_lowercase().contains(&needle)
        || note.content.to_lowercase().contains(&needle)
        || note.tags.iter().any(|t| t.to_lowercase().contains(&needle));
      if !hit {
        return false;
      }
    }
    true
  }
}
