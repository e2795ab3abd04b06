//! Shared sort pipeline used by every CLI command.

use std::path::Path;

use serde::Serialize;

use pbxsort_core::{reorder, Config, Diagnostic, Reordered, SectionKind};
use pbxsort_detector::{find_projects, ProjectFile};

use crate::error::io_err;
use crate::writer::{atomic_write, WriteResult};
use crate::SyncError;

/// Outcome of sorting one project.
#[derive(Debug, Clone)]
pub struct SortReport {
    pub write: WriteResult,
    /// Sections whose body changed.
    pub changed: Vec<SectionKind>,
    /// Optional build-phase sections absent from the file.
    pub skipped: Vec<SectionKind>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One project of a batch run and what happened to it.
#[derive(Debug)]
pub struct ProjectResult {
    pub project: ProjectFile,
    pub outcome: Result<SortReport, SyncError>,
}

/// Whether a project was already in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Sorted,
    Unsorted,
    Failed,
}

impl ProjectResult {
    pub fn status(&self) -> ProjectStatus {
        match &self.outcome {
            Ok(SortReport {
                write: WriteResult::Unchanged { .. },
                ..
            }) => ProjectStatus::Sorted,
            Ok(_) => ProjectStatus::Unsorted,
            Err(_) => ProjectStatus::Failed,
        }
    }
}

/// Reads `path` and reorders its text. Returns the text as read alongside the
/// engine result.
pub(crate) fn reorder_file(path: &Path, config: &Config) -> Result<(String, Reordered), SyncError> {
    let original = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let reordered = reorder(&original, config).map_err(|source| SyncError::Engine {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((original, reordered))
}

/// Sorts a single project file in place (or reports what would change when
/// `dry_run` is set).
pub fn sort_project(
    project: &ProjectFile,
    config: &Config,
    dry_run: bool,
) -> Result<SortReport, SyncError> {
    let path = &project.pbxproj;
    let (original, reordered) = reorder_file(path, config)?;
    let write = atomic_write(path, &original, &reordered.text, dry_run)?;

    Ok(SortReport {
        write,
        changed: reordered.changed,
        skipped: reordered.skipped,
        diagnostics: reordered.diagnostics,
    })
}

/// Discovers the projects at `path` and sorts each one.
///
/// Discovery errors abort the run. A failure in one project is recorded in
/// its [`ProjectResult`] and the remaining projects are still processed.
pub fn run(path: &Path, config: &Config, dry_run: bool) -> Result<Vec<ProjectResult>, SyncError> {
    let projects = find_projects(path, config)?;
    let mut results = Vec::with_capacity(projects.len());

    for project in projects {
        let outcome = sort_project(&project, config, dry_run);
        if let Err(err) = &outcome {
            tracing::warn!(project = %project.name, error = %err, "project failed");
        }
        results.push(ProjectResult { project, outcome });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn run_on_empty_directory_returns_empty_vec() {
        let dir = TempDir::new().expect("tmp");
        let result = run(dir.path(), &Config::default(), true).expect("run");
        assert!(result.is_empty());
    }

    #[test]
    fn missing_required_section_is_engine_error_with_path() {
        let dir = TempDir::new().expect("tmp");
        let bundle = dir.path().join("Broken.xcodeproj");
        fs::create_dir_all(&bundle).expect("mkdir");
        fs::write(bundle.join("project.pbxproj"), "{\n}\n").expect("write");

        let results = run(dir.path(), &Config::default(), false).expect("run");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status(), ProjectStatus::Failed);
        let err = results[0].outcome.as_ref().unwrap_err();
        assert!(matches!(err, SyncError::Engine { .. }));
        assert!(err.to_string().contains("Broken.xcodeproj"));
    }
}
