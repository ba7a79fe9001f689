//! JSON-file backend for the study planner.
//!
//! Each collection is one JSON array on disk. [`FileDb`] owns the files:
//! writes to the same file are queued in submission order, and the previous
//! content is copied to a timestamped backup before every overwrite. The
//! repositories in [`repo`] express domain operations as read-modify-write
//! cycles over those collections, and [`JsonStore`] wires them together
//! behind [`planner_core::store::PlannerStore`].

mod backup;
mod db;
mod lock;
mod paths;
mod store;

pub mod error;
pub mod repo;
pub mod seed;

pub use db::{Change, FileDb, FileStats};
pub use error::{Error, Result};
pub use lock::{WriteLocks, WriteTicket};
pub use paths::DataPaths;
pub use store::{Assignments, Courses, JsonStore};
