//! Assignments: dated pieces of coursework tracked through to completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, date::lenient, validate};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AssignmentStatus {
  #[default]
  Pending,
  InProgress,
  Completed,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
  pub id:          String,
  pub title:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(deserialize_with = "lenient::deserialize")]
  pub due_date:    DateTime<Utc>,
  /// Soft reference to [`crate::course::Course::id`].
  pub course_id:   String,
  pub status:      AssignmentStatus,
  pub priority:    Priority,
  /// Set once at creation; never changes.
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Assignment {
  /// Build an assignment from validated input. `created_at` and `updated_at`
  /// are both set to `now`.
  pub fn from_new(id: String, input: NewAssignment, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: input.title,
      description: input.description,
      due_date: input.due_date,
      course_id: input.course_id,
      status: input.status.unwrap_or_default(),
      priority: input.priority.unwrap_or_default(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_completed(&self) -> bool { self.status == AssignmentStatus::Completed }

  /// Past due and still open.
  pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
    !self.is_completed() && self.due_date < now
  }
}

/// Input to [`crate::store::PlannerStore::create_assignment`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(deserialize_with = "lenient::deserialize")]
  pub due_date:    DateTime<Utc>,
  pub course_id:   String,
  #[serde(default)]
  pub status:      Option<AssignmentStatus>,
  #[serde(default)]
  pub priority:    Option<Priority>,
}

impl NewAssignment {
  /// Convenience constructor with all optional fields unset.
  pub fn new(
    title: impl Into<String>,
    course_id: impl Into<String>,
    due_date: DateTime<Utc>,
  ) -> Self {
    Self {
      title: title.into(),
      description: None,
      due_date,
      course_id: course_id.into(),
      status: None,
      priority: None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate::length("title", &self.title, 1, 200)?;
    validate::optional_length("description", self.description.as_deref(), 1000)?;
    validate::length("courseId", &self.course_id, 1, usize::MAX)
  }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPatch {
  pub title:       Option<String>,
  pub description: Option<String>,
  #[serde(default, deserialize_with = "lenient::deserialize_option")]
  pub due_date:    Option<DateTime<Utc>>,
  pub course_id:   Option<String>,
  pub status:      Option<AssignmentStatus>,
  pub priority:    Option<Priority>,
}

impl AssignmentPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(title) = &self.title {
      validate::length("title", title, 1, 200)?;
    }
    validate::optional_length("description", self.description.as_deref(), 1000)?;
    if let Some(course_id) = &self.course_id {
      validate::length("courseId", course_id, 1, usize::MAX)?;
    }
    Ok(())
  }

  /// Apply the patch and refresh `updated_at`.
  pub fn apply(self, assignment: &mut Assignment, now: DateTime<Utc>) {
    if let Some(title) = self.title {
      assignment.title = title;
    }
    if let Some(description) = self.description {
      assignment.description = Some(description);
    }
    if let Some(due_date) = self.due_date {
      assignment.due_date = due_date;
    }
    if let Some(course_id) = self.course_id {
      assignment.course_id = course_id;
    }
    if let Some(status) = self.status {
      assignment.status = status;
    }
    if let Some(priority) = self.priority {
      assignment.priority = priority;
    }
    assignment.updated_at = now;
  }
}

/// Parameters for [`crate::store::PlannerStore::list_assignments`].
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
  pub course_id:  Option<String>,
  pub status:     Option<AssignmentStatus>,
  pub priority:   Option<Priority>,
  /// Inclusive lower bound on `due_date`.
  pub due_after:  Option<DateTime<Utc>>,
  /// Inclusive upper bound on `due_date`.
  pub due_before: Option<DateTime<Utc>>,
  /// Keep only assignments overdue as of this instant.
  pub overdue_at: Option<DateTime<Utc>>,
  /// Case-insensitive match over title and description.
  pub text:       Option<String>,
}

impl AssignmentQuery {
  pub fn overdue(now: DateTime<Utc>) -> Self {
    Self {
      overdue_at: Some(now),
      ..Default::default()
    }
  }

  pub fn matches(&self, a: &Assignment) -> bool {
    if self.course_id.as_deref().is_some_and(|c| c != a.course_id) {
      return false;
    }
    if self.status.is_some_and(|s| s != a.status) {
      return false;
    }
    if self.priority.is_some_and(|p| p != a.priority) {
      return false;
    }
    if self.due_after.is_some_and(|t| a.due_date < t) {
      return false;
    }
    if self.due_before.is_some_and(|t| a.due_date > t) {
      return false;
    }
    if self.overdue_at.is_some_and(|t| !a.is_overdue(t)) {
      return false;
    }
    if let Some(text) = &self.text {
      let needle = text.to_lowercase();
      let hit = a.title.to_lowercase().contains(&needle)
        || a
          .description
          .as_deref()
          .is_some_and(|d| d.to_lowercase().contains(&needle));
      if !hit {
        return false;
      }
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn hw1(now: DateTime<Utc>) -> Assignment {
    let due = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
    Assignment::from_new("a1".into(), NewAssignment::new("HW1", "c1", due), now)
  }

  #[test]
  fn defaults_on_create() {
    let now = Utc::now();
    let a = hw1(now);
    assert_eq!(a.status, AssignmentStatus::Pending);
    assert_eq!(a.priority, Priority::Medium);
    assert_eq!(a.created_at, a.updated_at);
  }

  #[test]
  fn status_wire_format() {
    let json = serde_json::to_value(AssignmentStatus::InProgress).unwrap();
    assert_eq!(json, "in-progress");
    assert_eq!(AssignmentStatus::InProgress.to_string(), "in-progress");
  }

  #[test]
  fn create_body_accepts_date_only_due_date() {
    let body = serde_json::json!({
      "title": "HW1",
      "courseId": "c1",
      "dueDate": "2024-12-01",
      "priority": "high"
    });
    let input: NewAssignment = serde_json::from_value(body).unwrap();
    assert_eq!(input.priority, Some(Priority::High));
    assert_eq!(
      input.due_date,
      Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
    );
  }

  #[test]
  fn patch_refreshes_updated_at_only() {
    let created = Utc::now();
    let mut a = hw1(created);
    let later = created + Duration::minutes(5);
    AssignmentPatch {
      status: Some(AssignmentStatus::Completed),
      ..Default::default()
    }
    .apply(&mut a, later);
    assert_eq!(a.status, AssignmentStatus::Completed);
    assert_eq!(a.created_at, created);
    assert_eq!(a.updated_at, later);
  }

  #[test]
  fn overdue_ignores_completed() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut a = hw1(now);
    assert!(a.is_overdue(now));
    a.status = AssignmentStatus::Completed;
    assert!(!a.is_overdue(now));
    assert!(!AssignmentQuery::overdue(now).matches(&a));
  }

  #[test]
  fn date_range_is_inclusive() {
    let a = hw1(Utc::now());
    let query = AssignmentQuery {
      due_after: Some(a.due_date),
      due_before: Some(a.due_date),
      ..Default::default()
    };
    assert!(query.matches(&a));
  }

  #[test]
  fn empty_title_is_rejected() {
    let input = NewAssignment::new("", "c1", Utc::now());
    assert!(input.validate().is_err());
  }
}
