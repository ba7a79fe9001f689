//! Best-effort copies of a collection file taken before it is overwritten
//! or removed.

use std::{
  io::{self, ErrorKind},
  path::PathBuf,
};

use chrono::{Duration, Utc};
use tokio::{
  fs::{self, File, OpenOptions},
  io::AsyncWriteExt as _,
};

use crate::paths::DataPaths;

/// Copy the live file of `name` into the backup directory.
///
/// Returns the backup path, or `None` if there was no live file or the copy
/// failed. Failures are logged and never propagated.
pub(crate) async fn backup(paths: &DataPaths, name: &str) -> Option<PathBuf> {
  match copy_to_backup(paths, name).await {
    Ok(Some(dest)) => {
      tracing::debug!(collection = name, backup = %dest.display(), "backed up collection");
      Some(dest)
    }
    Ok(None) => None,
    Err(e) => {
      tracing::warn!(collection = name, error = %e, "failed to back up collection");
      None
    }
  }
}

async fn copy_to_backup(paths: &DataPaths, name: &str) -> io::Result<Option<PathBuf>> {
  let mut src = match File::open(paths.collection(name)).await {
    Ok(f) => f,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(e),
  };

  fs::create_dir_all(paths.backup_dir()).await?;

  // Claim a fresh name; on a collision step forward a millisecond so the
  // names keep sorting by creation time.
  let mut at = Utc::now();
  let (dest_path, mut dest) = loop {
    let candidate = paths.backup(name, at);
    match OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&candidate)
      .await
    {
      Ok(f) => break (candidate, f),
      Err(e) if e.kind() == ErrorKind::AlreadyExists => at += Duration::milliseconds(1),
      Err(e) => return Err(e),
    }
  };

  let copied = async {
    tokio::io::copy(&mut src, &mut dest).await?;
    dest.flush().await
  }
  .await;

  if let Err(e) = copied {
    let _ = fs::remove_file(&dest_path).await;
    return Err(e);
  }
  Ok(Some(dest_path))
}
