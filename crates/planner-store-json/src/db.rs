//! `FileDb`: whole-collection reads and writes over JSON array files.

use std::{
  future::Future,
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;
use tracing::{debug, error, info};

use crate::{
  backup,
  error::{Error, Result},
  lock::{WriteLocks, WriteTicket},
  paths::{self, DataPaths},
};

/// Outcome of a [`FileDb::modify`] closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<R> {
  /// Persist the modified records, then return the value.
  Write(R),
  /// Leave the file untouched and return the value.
  Keep(R),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
  pub size:        u64,
  /// Falls back to the modification time where the platform has no
  /// creation time.
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

/// A directory of JSON collections.
///
/// Cheap to clone; clones share the same write queues.
#[derive(Clone)]
pub struct FileDb {
  paths: Arc<DataPaths>,
  locks: WriteLocks,
}

impl FileDb {
  pub fn new(paths: DataPaths) -> Self {
    Self {
      paths: Arc::new(paths),
      locks: WriteLocks::new(),
    }
  }

  /// Resolve both directories to absolute paths and create them.
  pub async fn open(paths: DataPaths) -> Result<Self> {
    let data_dir =
      std::path::absolute(paths.data_dir()).map_err(Error::io(paths.data_dir()))?;
    let backup_dir =
      std::path::absolute(paths.backup_dir()).map_err(Error::io(paths.backup_dir()))?;
    let paths = DataPaths::new(data_dir).with_backup_dir(backup_dir);

    for dir in [paths.data_dir(), paths.backup_dir()] {
      fs::create_dir_all(dir).await.map_err(Error::io(dir))?;
    }
    info!(
      data_dir = %paths.data_dir().display(),
      backup_dir = %paths.backup_dir().display(),
      "opened data directory"
    );
    Ok(Self::new(paths))
  }

  pub fn paths(&self) -> &DataPaths { &self.paths }

  pub fn locks(&self) -> &WriteLocks { &self.locks }

  // ─── Reads ────────────────────────────────────────────────────────────────

  /// All records of a collection.
  ///
  /// A missing file is created holding `[]`; an empty file reads as no
  /// records. Anything that is not an array of `T` is reported as
  /// [`Error::CorruptCollection`] after a copy of the file is backed up.
  pub async fn read_all<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
    let path = self.paths.collection(name);
    match fs::read_to_string(&path).await {
      Ok(text) => {
        let records = self.decode(name, &path, &text).await?;
        debug!(collection = name, records = records.len(), "read collection");
        Ok(records)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        self.initialize(name).await?;
        Ok(Vec::new())
      }
      Err(e) => Err(Error::io(&path)(e)),
    }
  }

  pub async fn exists(&self, name: &str) -> Result<bool> {
    let path = self.paths.collection(name);
    fs::try_exists(&path).await.map_err(Error::io(&path))
  }

  /// Size and timestamps of the collection file, or `None` if it is absent.
  pub async fn stats(&self, name: &str) -> Result<Option<FileStats>> {
    let path = self.paths.collection(name);
    let meta = match fs::metadata(&path).await {
      Ok(meta) => meta,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(Error::io(&path)(e)),
    };
    let modified_at: DateTime<Utc> = meta.modified().map_err(Error::io(&path))?.into();
    let created_at = meta
      .created()
      .map(DateTime::<Utc>::from)
      .unwrap_or(modified_at);
    Ok(Some(FileStats {
      size: meta.len(),
      created_at,
      modified_at,
    }))
  }

  /// Backups of a collection, oldest first.
  pub async fn backups(&self, name: &str) -> Result<Vec<PathBuf>> {
    let dir = self.paths.backup_dir();
    let mut entries = match fs::read_dir(dir).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(Error::io(dir)(e)),
    };

    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(Error::io(dir))? {
      let file_name = entry.file_name();
      if file_name
        .to_str()
        .is_some_and(|file_name| paths::is_backup_of(name, file_name))
      {
        found.push(entry.path());
      }
    }
    found.sort();
    Ok(found)
  }

  // ─── Writes ───────────────────────────────────────────────────────────────

  /// Replace a collection with `records`.
  ///
  /// The write joins the collection's queue when this is called; records
  /// that fail to serialize are reported without queueing anything.
  pub fn write_all<T: Serialize>(
    &self,
    name: &str,
    records: &[T],
  ) -> impl Future<Output = Result<()>> + Send + use<T> {
    let queued = serde_json::to_string_pretty(records)
      .map_err(Error::from)
      .map(|body| (body, self.locks.enqueue(self.paths.collection(name))));
    let db = self.clone();
    let name = name.to_owned();

    async move {
      let (body, mut ticket) = queued?;
      ticket.wait_turn().await;
      db.commit(name, body, ticket).await
    }
  }

  /// Read-modify-write a collection while holding its write queue.
  ///
  /// `f` sees the latest persisted records. Returning [`Change::Write`]
  /// persists them; [`Change::Keep`] or an error leaves the file as it was.
  /// A missing file is treated as an empty collection.
  pub fn modify<T, R, F>(
    &self,
    name: &str,
    f: F,
  ) -> impl Future<Output = Result<R>> + Send + use<T, R, F>
  where
    T: Serialize + DeserializeOwned + Send,
    R: Send,
    F: FnOnce(&mut Vec<T>) -> Result<Change<R>> + Send,
  {
    let mut ticket = self.locks.enqueue(self.paths.collection(name));
    let db = self.clone();
    let name = name.to_owned();

    async move {
      ticket.wait_turn().await;
      let mut records = db.read_locked::<T>(&name).await?;
      match f(&mut records)? {
        Change::Keep(out) => Ok(out),
        Change::Write(out) => {
          let body = serde_json::to_string_pretty(&records)?;
          db.commit(name, body, ticket).await?;
          Ok(out)
        }
      }
    }
  }

  /// Remove a collection file, backing it up first. Returns whether a file
  /// was removed.
  pub async fn delete(&self, name: &str) -> Result<bool> {
    let path = self.paths.collection(name);
    let mut ticket = self.locks.enqueue(path.clone());
    ticket.wait_turn().await;

    backup::backup(&self.paths, name).await;
    match fs::remove_file(&path).await {
      Ok(()) => {
        info!(collection = name, "deleted collection");
        Ok(true)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
      Err(e) => Err(Error::io(&path)(e)),
    }
  }

  // ─── Internals ────────────────────────────────────────────────────────────

  async fn initialize(&self, name: &str) -> Result<()> {
    let path = self.paths.collection(name);
    let mut ticket = self.locks.enqueue(path.clone());
    ticket.wait_turn().await;

    // Another writer may have created it while we queued.
    if fs::try_exists(&path).await.map_err(Error::io(&path))? {
      return Ok(());
    }
    self.commit(name.to_owned(), "[]".to_owned(), ticket).await?;
    debug!(collection = name, "initialized empty collection");
    Ok(())
  }

  /// Like [`Self::read_all`] but never writes; the caller holds the queue.
  async fn read_locked<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
    let path = self.paths.collection(name);
    match fs::read_to_string(&path).await {
      Ok(text) => self.decode(name, &path, &text).await,
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
      Err(e) => Err(Error::io(&path)(e)),
    }
  }

  async fn decode<T: DeserializeOwned>(
    &self,
    name: &str,
    path: &Path,
    text: &str,
  ) -> Result<Vec<T>> {
    let err = match parse(name, path, text) {
      Ok(records) => return Ok(records),
      Err(err) => err,
    };
    error!(collection = name, error = %err, "collection is corrupt");
    if self.latest_backup_holds(name, text).await {
      debug!(collection = name, "corrupt collection is already backed up");
    } else if let Some(copy) = backup::backup(&self.paths, name).await {
      info!(collection = name, backup = %copy.display(), "kept a copy of the corrupt collection");
    }
    Err(err)
  }

  /// Whether the newest backup of `name` has exactly `text` as content.
  async fn latest_backup_holds(&self, name: &str, text: &str) -> bool {
    let Ok(backups) = self.backups(name).await else {
      return false;
    };
    let Some(latest) = backups.last() else {
      return false;
    };
    fs::read_to_string(latest)
      .await
      .is_ok_and(|copy| copy == text)
  }

  /// Replace the file from a task that owns `ticket`.
  ///
  /// Dropping the caller does not stop the write; the queue is released only
  /// once the file is fully replaced or the write has failed.
  async fn commit(&self, name: String, body: String, ticket: WriteTicket) -> Result<()> {
    let db = self.clone();
    tokio::spawn(async move {
      let out = db.replace(&name, &body).await;
      drop(ticket);
      out
    })
    .await?
  }

  /// Back up the current file, then atomically swap in `body`.
  async fn replace(&self, name: &str, body: &str) -> Result<()> {
    let path = self.paths.collection(name);
    for dir in [self.paths.data_dir(), self.paths.backup_dir()] {
      fs::create_dir_all(dir).await.map_err(Error::io(dir))?;
    }

    backup::backup(&self.paths, name).await;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).await.map_err(Error::io(&tmp))?;
    fs::rename(&tmp, &path).await.map_err(Error::io(&path))?;
    debug!(collection = name, bytes = body.len(), "wrote collection");
    Ok(())
  }
}

fn parse<T: DeserializeOwned>(name: &str, path: &Path, text: &str) -> Result<Vec<T>> {
  if text.trim().is_empty() {
    return Ok(Vec::new());
  }
  let value: serde_json::Value =
    serde_json::from_str(text).map_err(|e| Error::corrupt(name, path, e.to_string()))?;
  let serde_json::Value::Array(items) = value else {
    return Err(Error::corrupt(name, path, "top-level value is not an array"));
  };
  items
    .into_iter()
    .enumerate()
    .map(|(i, item)| {
      serde_json::from_value(item)
        .map_err(|e| Error::corrupt(name, path, format!("record {i}: {e}")))
    })
    .collect()
}
