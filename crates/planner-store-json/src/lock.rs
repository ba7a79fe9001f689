//! Per-file write serialization.
//!
//! Every write to a path takes a [`WriteTicket`]. Tickets for the same path
//! are granted in the order they were taken, one at a time; tickets for
//! different paths never wait on each other. A ticket is released when it is
//! dropped, whether the write finished, failed, or was cancelled.

use std::{
  collections::HashMap,
  future::Future,
  path::{Path, PathBuf},
  sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
  },
};

use futures::future::{BoxFuture, FutureExt as _, Shared};
use tokio::sync::oneshot;

/// Resolves once a ticket and every ticket queued before it are released.
type Released = Shared<BoxFuture<'static, ()>>;

struct Tail {
  ticket:   u64,
  released: Released,
}

#[derive(Default)]
struct Queues {
  tails: Mutex<HashMap<PathBuf, Tail>>,
  next:  AtomicU64,
}

/// FIFO write queues keyed by file path.
#[derive(Clone, Default)]
pub struct WriteLocks {
  queues: Arc<Queues>,
}

impl WriteLocks {
  pub fn new() -> Self { Self::default() }

  fn tails(&self) -> MutexGuard<'_, HashMap<PathBuf, Tail>> {
    self
      .queues
      .tails
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  /// Join the back of the queue for `path`.
  ///
  /// The position is fixed when this is called, not when the ticket is
  /// first awaited.
  pub fn enqueue(&self, path: impl Into<PathBuf>) -> WriteTicket {
    let path = path.into();
    let ticket = self.queues.next.fetch_add(1, Ordering::Relaxed);
    let (release, on_release) = oneshot::channel::<()>();

    let mut tails = self.tails();
    let predecessor = tails.get(&path).map(|tail| tail.released.clone());

    let prev = predecessor.clone();
    let released = async move {
      if let Some(prev) = prev {
        prev.await;
      }
      // Resolves with an error once the sender is dropped.
      let _ = on_release.await;
    }
    .boxed()
    .shared();

    tails.insert(path.clone(), Tail { ticket, released });
    drop(tails);

    WriteTicket {
      locks: self.clone(),
      path,
      ticket,
      predecessor,
      _release: release,
    }
  }

  /// Run `f` once every earlier write to `path` has been released.
  pub fn with_exclusive_write<F, Fut, T>(
    &self,
    path: PathBuf,
    f: F,
  ) -> impl Future<Output = T> + Send + use<F, Fut, T>
  where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = T> + Send,
    T: Send,
  {
    let mut ticket = self.enqueue(path);
    async move {
      ticket.wait_turn().await;
      let out = f().await;
      drop(ticket);
      out
    }
  }
}

/// A place in the write queue of one path.
pub struct WriteTicket {
  locks:       WriteLocks,
  path:        PathBuf,
  ticket:      u64,
  predecessor: Option<Released>,
  _release:    oneshot::Sender<()>,
}

impl WriteTicket {
  pub fn path(&self) -> &Path { &self.path }

  /// Wait until every ticket taken earlier for the same path is released.
  ///
  /// Cancel-safe: if this future is dropped the ticket keeps its place.
  pub async fn wait_turn(&mut self) {
    if let Some(prev) = self.predecessor.clone() {
      prev.await;
      self.predecessor = None;
    }
  }

  fn has_turn(&self) -> bool { self.predecessor.is_none() }
}

impl Drop for WriteTicket {
  fn drop(&mut self) {
    // A ticket dropped before its turn stays in the map: its released future
    // still waits for the predecessor, which later tickets must honour.
    if !self.has_turn() {
      return;
    }
    let mut tails = self.locks.tails();
    if tails.get(&self.path).is_some_and(|tail| tail.ticket == self.ticket) {
      tails.remove(&self.path);
    }
  }
}
