//! Mapping from logical collection names to files on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

const EXTENSION: &str = ".json";

/// Length of a backup timestamp, e.g. `2024-11-01T09-30-00-123Z`.
const STAMP_LEN: usize = 24;

/// Locations of the live collection files and their backups.
///
/// Every method is a pure path computation; nothing here touches the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
  data_dir:   PathBuf,
  backup_dir: PathBuf,
}

impl DataPaths {
  /// Collections live directly in `data_dir`; backups in `data_dir/backups`.
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    let data_dir = data_dir.into();
    let backup_dir = data_dir.join("backups");
    Self { data_dir, backup_dir }
  }

  pub fn with_backup_dir(mut self, backup_dir: impl Into<PathBuf>) -> Self {
    self.backup_dir = backup_dir.into();
    self
  }

  pub fn data_dir(&self) -> &Path { &self.data_dir }

  pub fn backup_dir(&self) -> &Path { &self.backup_dir }

  /// `assignments` and `assignments.json` both map to
  /// `<data_dir>/assignments.json`.
  pub fn collection(&self, name: &str) -> PathBuf {
    self.data_dir.join(format!("{}{EXTENSION}", stem(name)))
  }

  /// `<backup_dir>/<stem>-<timestamp>.json`, where the timestamp is `at` in
  /// RFC 3339 with millisecond precision and `:`/`.` replaced by `-`, so
  /// names sort by creation time.
  pub fn backup(&self, name: &str, at: DateTime<Utc>) -> PathBuf {
    self
      .backup_dir
      .join(format!("{}-{}{EXTENSION}", stem(name), backup_stamp(at)))
  }
}

fn stem(name: &str) -> &str { name.strip_suffix(EXTENSION).unwrap_or(name) }

fn backup_stamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
    .replace([':', '.'], "-")
}

/// Whether `file_name` is a backup of collection `name`.
pub(crate) fn is_backup_of(name: &str, file_name: &str) -> bool {
  file_name
    .strip_prefix(stem(name))
    .and_then(|rest| rest.strip_prefix('-'))
    .and_then(|rest| rest.strip_suffix(EXTENSION))
    .is_some_and(|stamp| stamp.len() == STAMP_LEN && stamp.ends_with('Z'))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 1, 9, 30, 0).unwrap()
      + chrono::Duration::milliseconds(123)
  }

  #[test]
  fn extension_is_appended_once() {
    let paths = DataPaths::new("/srv/planner");
    assert_eq!(
      paths.collection("assignments"),
      PathBuf::from("/srv/planner/assignments.json")
    );
    assert_eq!(
      paths.collection("assignments.json"),
      PathBuf::from("/srv/planner/assignments.json")
    );
  }

  #[test]
  fn backup_names_are_filesystem_safe() {
    let paths = DataPaths::new("/srv/planner");
    assert_eq!(
      paths.backup("notes.json", at()),
      PathBuf::from("/srv/planner/backups/notes-2024-11-01T09-30-00-123Z.json")
    );
  }

  #[test]
  fn backup_dir_can_be_moved() {
    let paths = DataPaths::new("/srv/planner").with_backup_dir("/var/backups/planner");
    assert!(paths.backup("notes", at()).starts_with("/var/backups/planner"));
  }

  #[test]
  fn backup_names_sort_chronologically() {
    let paths = DataPaths::new("d");
    let earlier = paths.backup("notes", at());
    let later = paths.backup("notes", at() + chrono::Duration::milliseconds(1));
    assert!(earlier < later);
  }

  #[test]
  fn recognises_own_backups_only() {
    assert!(is_backup_of("notes", "notes-2024-11-01T09-30-00-123Z.json"));
    assert!(!is_backup_of("notes", "notes-archive-2024-11-01T09-30-00-123Z.json"));
    assert!(!is_backup_of("notes", "notes.json"));
    assert!(!is_backup_of("note", "notes-2024-11-01T09-30-00-123Z.json"));
  }
}
