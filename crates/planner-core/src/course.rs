//! Courses, the parents that assignments and notes hang off.
//!
//! A course is identified by its `id`, but is also unique by the combination
//! of `code`, `semester` and `year`.

use serde::{Deserialize, Serialize};

use crate::{Result, validate};

/// Fallback display color for courses created without one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Academic term. Ordered by position in the calendar year.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
)]
pub enum Semester {
  Spring,
  Summer,
  Fall,
  Winter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
  pub id:         String,
  pub name:       String,
  pub code:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instructor: Option<String>,
  pub color:      String,
  pub semester:   Semester,
  pub year:       i32,
}

impl Course {
  /// Build a course from validated input; the caller supplies the id.
  pub fn from_new(id: String, input: NewCourse) -> Self {
    Self {
      id,
      name: input.name,
      code: input.code,
      instructor: input.instructor,
      color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
      semester: input.semester,
      year: input.year,
    }
  }

  /// Whether this course occupies the `(code, semester, year)` key.
  pub fn has_key(&self, code: &str, semester: Semester, year: i32) -> bool {
    self.code == code && self.semester == semester && self.year == year
  }
}

/// Input to [`crate::store::PlannerStore::create_course`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
  pub name:       String,
  pub code:       String,
  #[serde(default)]
  pub instructor: Option<String>,
  #[serde(default)]
  pub color:      Option<String>,
  pub semester:   Semester,
  pub year:       i32,
}

impl NewCourse {
  /// Convenience constructor with optional fields left empty.
  pub fn new(
    name: impl Into<String>,
    code: impl Into<String>,
    semester: Semester,
    year: i32,
  ) -> Self {
    Self {
      name: name.into(),
      code: code.into(),
      instructor: None,
      color: None,
      semester,
      year,
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate::length("name", &self.name, 1, 100)?;
    validate::course_code("code", &self.code)?;
    validate::optional_length("instructor", self.instructor.as_deref(), 100)?;
    if let Some(color) = &self.color {
      validate::hex_color("color", color)?;
    }
    validate::year("year", self.year)
  }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
  pub name:       Option<String>,
  pub code:       Option<String>,
  pub instructor: Option<String>,
  pub color:      Option<String>,
  pub semester:   Option<Semester>,
  pub year:       Option<i32>,
}

impl CoursePatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      validate::length("name", name, 1, 100)?;
    }
    if let Some(code) = &self.code {
      validate::course_code("code", code)?;
    }
    validate::optional_length("instructor", self.instructor.as_deref(), 100)?;
    if let Some(color) = &self.color {
      validate::hex_color("color", color)?;
    }
    if let Some(year) = self.year {
      validate::year("year", year)?;
    }
    Ok(())
  }

  /// Whether applying the patch can change the uniqueness key.
  pub fn touches_key(&self) -> bool {
    self.code.is_some() || self.semester.is_some() || self.year.is_some()
  }

  pub fn apply(self, course: &mut Course) {
    if let Some(name) = self.name {
      course.name = name;
    }
    if let Some(code) = self.code {
      course.code = code;
    }
    if let Some(instructor) = self.instructor {
      course.instructor = Some(instructor);
    }
    if let Some(color) = self.color {
      course.color = color;
    }
    if let Some(semester) = self.semester {
      course.semester = semester;
    }
    if let Some(year) = self.year {
      course.year = year;
    }
  }
}

/// Parameters for [`crate::store::PlannerStore::list_courses`].
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
  pub semester: Option<Semester>,
  pub year:     Option<i32>,
  /// Case-insensitive match over name, code and instructor.
  pub text:     Option<String>,
}

impl CourseQuery {
  pub fn matches(&self, course: &Course) -> bool {
    if self.semester.is_some_and(|s| s != course.semester) {
      return false;
    }
    if self.year.is_some_and(|y| y != course.year) {
      return false;
    }
    if let Some(text) = &self.text {
      let needle = text.to_lowercase();
      let hit = course.name.to_lowercase().contains(&needle)
        || course.code.to_lowercase().contains(&needle)
        || course
          .instructor
          .as_deref()
          .is_some_and(|i| i.to_lowercase().contains(&needle));
      if !hit {
        return false;
      }
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cs101() -> Course {
    let mut input = NewCourse::new("Intro to CS", "CS101", Semester::Fall, 2024);
    input.instructor = Some("Dr. Smith".into());
    Course::from_new("course-1".into(), input)
  }

  #[test]
  fn new_course_gets_default_color() {
    assert_eq!(cs101().color, DEFAULT_COLOR);
  }

  #[test]
  fn wire_format_is_camel_case() {
    let json = serde_json::to_value(cs101()).unwrap();
    assert_eq!(json["semester"], "Fall");
    assert_eq!(json["year"], 2024);
    assert_eq!(json["instructor"], "Dr. Smith");
  }

  #[test]
  fn patch_keeps_absent_fields() {
    let mut course = cs101();
    CoursePatch {
      name: Some("Computer Science I".into()),
      ..Default::default()
    }
    .apply(&mut course);
    assert_eq!(course.name, "Computer Science I");
    assert_eq!(course.code, "CS101");
    assert_eq!(course.instructor.as_deref(), Some("Dr. Smith"));
  }

  #[test]
  fn query_text_matches_instructor() {
    let query = CourseQuery {
      text: Some("smith".into()),
      ..Default::default()
    };
    assert!(query.matches(&cs101()));
  }

  #[test]
  fn query_year_filters() {
    let query = CourseQuery {
      year: Some(2025),
      ..Default::default()
    };
    assert!(!query.matches(&cs101()));
  }

  #[test]
  fn invalid_year_is_rejected() {
    let input = NewCourse::new("Intro", "CS101", Semester::Fall, 2019);
    assert!(input.validate().is_err());
  }
}
