//! # pbxsort-sync
//!
//! File pipeline around the reordering engine: read a `project.pbxproj`, run
//! [`pbxsort_core::reorder`], and write the result back atomically.
//!
//! Call [`sort_project`] for a single project or [`run`] to discover and
//! process every project under a path. [`diff_project`] previews a sort
//! without touching the file.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use diff::{diff_project, FileDiff};
pub use error::SyncError;
pub use pipeline::{run, sort_project, ProjectResult, ProjectStatus, SortReport};
pub use writer::WriteResult;
