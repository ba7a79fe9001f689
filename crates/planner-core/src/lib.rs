//! Core types and trait definitions for the study planner.
//!
//! No HTTP or filesystem code lives here. Storage backends and the REST
//! layer depend on this crate, never the other way round.

pub mod assignment;
pub mod course;
pub mod dashboard;
pub mod date;
pub mod error;
pub mod note;
pub mod store;

mod validate;

pub use error::{Error, RecordKind, Result};
