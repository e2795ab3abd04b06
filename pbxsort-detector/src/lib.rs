//! Project discovery for `pbxsort-detector`.
//!
//! `find_projects(path, config)` turns a command-line path into the list of
//! `project.pbxproj` files to process. The path may be:
//!
//! - a `project.pbxproj` file,
//! - an `.xcodeproj` bundle,
//! - any other directory, searched for bundles (direct children only unless
//!   `config.recursive` is set).
//!
//! Results are sorted by bundle path so every run visits projects in the same
//! order.

use std::fs;
use std::path::{Path, PathBuf};

use pbxsort_core::Config;
use serde::Serialize;
use thiserror::Error;

/// Extension of an Xcode project bundle.
pub const BUNDLE_EXTENSION: &str = "xcodeproj";

/// File inside a bundle that holds the object graph.
pub const PBXPROJ_FILE: &str = "project.pbxproj";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A discovered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFile {
    /// Bundle name without extension (e.g. `"Demo"` for `Demo.xcodeproj`).
    pub name: String,
    pub bundle: PathBuf,
    pub pbxproj: PathBuf,
}

impl ProjectFile {
    fn from_bundle(bundle: &Path) -> Self {
        let name = bundle
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            bundle: bundle.to_path_buf(),
            pbxproj: bundle.join(PBXPROJ_FILE),
        }
    }
}

/// Errors from project discovery.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not an Xcode project (expected a .xcodeproj bundle or project.pbxproj)")]
    NotAProject { path: PathBuf },
}

fn io_err(path: &Path, source: std::io::Error) -> DetectError {
    DetectError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolves `path` to the projects it names or contains.
///
/// An empty result is not an error: a directory may simply hold no projects.
pub fn find_projects(path: &Path, config: &Config) -> Result<Vec<ProjectFile>, DetectError> {
    let meta = fs::metadata(path).map_err(|e| io_err(path, e))?;

    if meta.is_file() {
        return match (path.file_name(), path.parent()) {
            (Some(name), Some(bundle)) if name == PBXPROJ_FILE && is_bundle(bundle) => {
                Ok(vec![ProjectFile::from_bundle(bundle)])
            }
            _ => Err(DetectError::NotAProject {
                path: path.to_path_buf(),
            }),
        };
    }

    if is_bundle(path) {
        let project = ProjectFile::from_bundle(path);
        if !project.pbxproj.is_file() {
            return Err(DetectError::NotAProject {
                path: path.to_path_buf(),
            });
        }
        return Ok(vec![project]);
    }

    let max_depth = if config.recursive { config.max_depth.max(1) } else { 1 };
    let mut found = Vec::new();
    scan(path, 1, max_depth, config, &mut found)?;
    found.sort_by(|a, b| a.bundle.cmp(&b.bundle));

    tracing::debug!(
        root = %path.display(),
        recursive = config.recursive,
        projects = found.len(),
        "discovered projects"
    );
    Ok(found)
}

// ---------------------------------------------------------------------------
// Directory walk
// ---------------------------------------------------------------------------

fn scan(
    dir: &Path,
    depth: usize,
    max_depth: usize,
    config: &Config,
    found: &mut Vec<ProjectFile>,
) -> Result<(), DetectError> {
    let entries = fs::read_dir(dir).map_err(|e| io_err(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name();
        if config.exclude.iter().any(|x| name.to_str() == Some(x.as_str())) {
            tracing::debug!(path = %path.display(), "excluded");
            continue;
        }

        if is_bundle(&path) {
            let project = ProjectFile::from_bundle(&path);
            if project.pbxproj.is_file() {
                found.push(project);
            } else {
                tracing::debug!(bundle = %path.display(), "bundle has no project.pbxproj; skipped");
            }
            continue;
        }

        if depth < max_depth {
            scan(&path, depth + 1, max_depth, config, found)?;
        }
    }
    Ok(())
}

fn is_bundle(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == BUNDLE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_name_is_file_stem() {
        let project = ProjectFile::from_bundle(Path::new("/work/My App.xcodeproj"));
        assert_eq!(project.name, "My App");
        assert_eq!(
            project.pbxproj,
            Path::new("/work/My App.xcodeproj/project.pbxproj")
        );
    }

    #[test]
    fn bundle_detection_uses_extension() {
        assert!(is_bundle(Path::new("Demo.xcodeproj")));
        assert!(!is_bundle(Path::new("Demo.xcworkspace")));
        assert!(!is_bundle(Path::new("xcodeproj")));
    }
}
