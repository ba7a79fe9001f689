//! Sample data for a fresh data directory.

use chrono::{DateTime, Utc};
use planner_core::{
  assignment::{Assignment, AssignmentStatus, Priority},
  course::{Course, Semester},
  date::parse_instant,
  note::Note,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::{
  Change, FileDb, Result,
  repo::{ASSIGNMENTS, COURSES, NOTES},
};

/// Number of records written to each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub courses:     usize,
  pub assignments: usize,
  pub notes:       usize,
}

/// Fill every collection that is currently empty with the sample records.
///
/// Collections that already hold records are left alone.
pub async fn seed_if_empty(db: &FileDb) -> Result<SeedReport> {
  let report = SeedReport {
    courses:     fill_if_empty(db, COURSES, sample_courses()).await?,
    assignments: fill_if_empty(db, ASSIGNMENTS, sample_assignments()?).await?,
    notes:       fill_if_empty(db, NOTES, sample_notes()?).await?,
  };
  info!(
    courses = report.courses,
    assignments = report.assignments,
    notes = report.notes,
    "seeding finished"
  );
  Ok(report)
}

/// Empty all three collections. The previous contents end up in backups.
pub async fn reset(db: &FileDb) -> Result<()> {
  for name in [COURSES, ASSIGNMENTS, NOTES] {
    db.write_all::<Course>(name, &[]).await?;
  }
  info!("reset all collections");
  Ok(())
}

async fn fill_if_empty<T>(db: &FileDb, name: &str, sample: Vec<T>) -> Result<usize>
where
  T: Serialize + DeserializeOwned + Send,
{
  let seeded = db
    .modify(name, move |records: &mut Vec<T>| {
      if !records.is_empty() {
        return Ok(Change::Keep(0));
      }
      *records = sample;
      Ok(Change::Write(records.len()))
    })
    .await?;
  if seeded > 0 {
    info!(collection = name, records = seeded, "seeded collection");
  }
  Ok(seeded)
}

fn day(s: &str) -> Result<DateTime<Utc>> { Ok(parse_instant(s)?) }

fn course(
  id: &str,
  name: &str,
  code: &str,
  instructor: &str,
  color: &str,
) -> Course {
  Course {
    id:         id.to_owned(),
    name:       name.to_owned(),
    code:       code.to_owned(),
    instructor: Some(instructor.to_owned()),
    color:      color.to_owned(),
    semester:   Semester::Fall,
    year:       2024,
  }
}

pub fn sample_courses() -> Vec<Course> {
  vec![
    course(
      "course-1",
      "Introduction to Computer Science",
      "CS101",
      "Dr. Smith",
      "#3B82F6",
    ),
    course(
      "course-2",
      "Data Structures and Algorithms",
      "CS201",
      "Prof. Johnson",
      "#10B981",
    ),
    course("course-3", "Database Systems", "CS301", "Dr. Williams", "#F59E0B"),
  ]
}

pub fn sample_assignments() -> Result<Vec<Assignment>> {
  let assignment = |id: &str,
                    title: &str,
                    description: &str,
                    due: &str,
                    course_id: &str,
                    status: AssignmentStatus,
                    priority: Priority,
                    (created, updated): (&str, &str)|
   -> Result<Assignment> {
    Ok(Assignment {
      id: id.to_owned(),
      title: title.to_owned(),
      description: Some(description.to_owned()),
      due_date: day(due)?,
      course_id: course_id.to_owned(),
      status,
      priority,
      created_at: day(created)?,
      updated_at: day(updated)?,
    })
  };

  Ok(vec![
    assignment(
      "assignment-1",
      "Basic Programming Concepts",
      "Complete exercises on variables, loops, and functions",
      "2024-12-15",
      "course-1",
      AssignmentStatus::Pending,
      Priority::Medium,
      ("2024-11-01", "2024-11-01"),
    )?,
    assignment(
      "assignment-2",
      "Binary Search Tree Implementation",
      "Implement a BST with insertion, deletion, and traversal methods",
      "2024-12-20",
      "course-2",
      AssignmentStatus::InProgress,
      Priority::High,
      ("2024-11-05", "2024-11-10"),
    )?,
    assignment(
      "assignment-3",
      "Database Design Project",
      "Design and implement a normalized database schema",
      "2024-12-25",
      "course-3",
      AssignmentStatus::Pending,
      Priority::High,
      ("2024-11-08", "2024-11-08"),
    )?,
    assignment(
      "assignment-4",
      "Algorithm Analysis Report",
      "Write a report analyzing time complexity of sorting algorithms",
      "2024-12-10",
      "course-2",
      AssignmentStatus::Completed,
      Priority::Low,
      ("2024-10-15", "2024-11-12"),
    )?,
  ])
}

pub fn sample_notes() -> Result<Vec<Note>> {
  let note = |id: &str,
              title: &str,
              content: &str,
              course_id: &str,
              assignment_id: Option<&str>,
              tags: &[&str],
              created: &str|
   -> Result<Note> {
    let at = day(created)?;
    Ok(Note {
      id: id.to_owned(),
      title: title.to_owned(),
      content: content.to_owned(),
      course_id: Some(course_id.to_owned()),
      assignment_id: assignment_id.map(str::to_owned),
      tags: tags.iter().map(|t| (*t).to_owned()).collect(),
      created_at: at,
      updated_at: at,
    })
  };

  Ok(vec![
    note(
      "note-1",
      "CS101 - Week 1 Notes",
      "Introduction to programming fundamentals. Covered variables, data types, and basic syntax.",
      "course-1",
      Some("assignment-1"),
      &["programming", "basics", "variables"],
      "2024-11-01",
    )?,
    note(
      "note-2",
      "Binary Trees Overview",
      "Binary trees are hierarchical data structures. Each node has at most two children: left and right.",
      "course-2",
      Some("assignment-2"),
      &["data-structures", "trees", "algorithms"],
      "2024-11-05",
    )?,
    note(
      "note-3",
      "Database Normalization Rules",
      "First Normal Form (1NF): Eliminate repeating groups. Second Normal Form (2NF): Eliminate partial dependencies.",
      "course-3",
      Some("assignment-3"),
      &["database", "normalization", "design"],
      "2024-11-08",
    )?,
    note(
      "note-4",
      "Big O Notation Cheat Sheet",
      "O(1) - Constant, O(log n) - Logarithmic, O(n) - Linear, O(n²) - Quadratic",
      "course-2",
      None,
      &["algorithms", "complexity", "big-o"],
      "2024-10-20",
    )?,
  ])
}
