//! Dashboard read model, computed from full snapshots of all three
//! collections, never stored.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{assignment::Assignment, course::Course, note::Note};

/// Window used for both "upcoming" assignments and "recent" notes.
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
  pub course:     Course,
  pub completed:  usize,
  pub total:      usize,
  /// Rounded to the nearest whole percent; 0 when the course has no work.
  pub percentage: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_assignments:     usize,
  pub completed_assignments: usize,
  pub completion_rate:       u32,
  pub total_notes:           usize,
  pub recent_notes:          usize,
  pub total_courses:         usize,
  pub overdue_count:         usize,
  pub upcoming_count:        usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub as_of:           DateTime<Utc>,
  /// Open assignments due within the next [`WINDOW_DAYS`], soonest first.
  pub upcoming:        Vec<Assignment>,
  /// Open assignments already past due, oldest first.
  pub overdue:         Vec<Assignment>,
  /// Notes created within the last [`WINDOW_DAYS`], newest first.
  pub recent_notes:    Vec<Note>,
  pub course_progress: Vec<CourseProgress>,
  pub stats:           DashboardStats,
}

fn percent(part: usize, whole: usize) -> u32 {
  if whole == 0 {
    return 0;
  }
  ((part as f64 / whole as f64) * 100.0).round() as u32
}

impl Dashboard {
  pub fn compute(
    courses: Vec<Course>,
    assignments: &[Assignment],
    notes: &[Note],
    now: DateTime<Utc>,
  ) -> Self {
    let horizon = now + Duration::days(WINDOW_DAYS);
    let cutoff = now - Duration::days(WINDOW_DAYS);

    let mut upcoming: Vec<Assignment> = assignments
      .iter()
      .filter(|a| !a.is_completed() && a.due_date > now && a.due_date < horizon)
      .cloned()
      .collect();
    upcoming.sort_by_key(|a| a.due_date);

    let mut overdue: Vec<Assignment> = assignments
      .iter()
      .filter(|a| a.is_overdue(now))
      .cloned()
      .collect();
    overdue.sort_by_key(|a| a.due_date);

    let mut recent_notes: Vec<Note> = notes
      .iter()
      .filter(|n| n.created_at > cutoff)
      .cloned()
      .collect();
    recent_notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total_courses = courses.len();
    let course_progress = courses
      .into_iter()
      .map(|course| {
        let (completed, total) = assignments
          .iter()
          .filter(|a| a.course_id == course.id)
          .fold((0, 0), |(done, all), a| {
            (done + usize::from(a.is_completed()), all + 1)
          });
        CourseProgress {
          course,
          completed,
          total,
          percentage: percent(completed, total),
        }
      })
      .collect();

    let completed_assignments = assignments.iter().filter(|a| a.is_completed()).count();
    let stats = DashboardStats {
      total_assignments: assignments.len(),
      completed_assignments,
      completion_rate: percent(completed_assignments, assignments.len()),
      total_notes: notes.len(),
      recent_notes: recent_notes.len(),
      total_courses,
      overdue_count: overdue.len(),
      upcoming_count: upcoming.len(),
    };

    Self {
      as_of: now,
      upcoming,
      overdue,
      recent_notes,
      course_progress,
      stats,
    }
  }
}
