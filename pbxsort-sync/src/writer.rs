//! Atomic project file writer.
//!
//! ## `atomic_write` protocol
//!
//! 1. Compare the reordered text with the text that was read → skip if equal.
//! 2. In dry-run mode, report what would be written and stop.
//! 3. Write to `<path>.pbxsort.tmp`, copying the original file's permissions.
//! 4. Rename over the final path (atomic on POSIX).
//!
//! Content is written exactly as produced by the engine; line endings are
//! never normalised.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WriteResult {
    /// File was rewritten in canonical order.
    Written { path: PathBuf },
    /// File was skipped, it is already in canonical order.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically replace `path` with `content` unless it equals `original`.
pub(crate) fn atomic_write(
    path: &Path,
    original: &str,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.pbxsort.tmp", path.display()));
    atomic_write_with_tmp(path, original, content, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    original: &str,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    if content == original {
        tracing::debug!(path = %path.display(), "unchanged");
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!(path = %path.display(), "[dry-run] would write");
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Ok(meta) = std::fs::metadata(path) {
        if let Err(e) = std::fs::set_permissions(tmp, meta.permissions()) {
            tracing::debug!(path = %tmp.display(), error = %e, "could not copy permissions");
        }
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!(path = %path.display(), "wrote");
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
