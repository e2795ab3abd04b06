//! Unified diff preview for `pbxsort diff`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::TextDiff;

use pbxsort_core::Config;
use pbxsort_detector::ProjectFile;

use crate::pipeline::reorder_file;
use crate::SyncError;

/// Diff between a project file and its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Computes what sorting `project` would change, without writing.
///
/// Returns `None` when the file is already in canonical order. Headers are
/// `a/<path>` / `b/<path>` with the path relative to `base` when possible.
pub fn diff_project(
    project: &ProjectFile,
    config: &Config,
    base: &Path,
) -> Result<Option<FileDiff>, SyncError> {
    let (original, reordered) = reorder_file(&project.pbxproj, config)?;
    if original == reordered.text {
        return Ok(None);
    }

    let relative = project
        .pbxproj
        .strip_prefix(base)
        .unwrap_or(project.pbxproj.as_path());
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(&original, &reordered.text)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(Some(FileDiff {
        path: project.pbxproj.clone(),
        unified_diff: unified,
    }))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const UNSORTED: &str = "\
/* Begin PBXBuildFile section */
\t\tF2 = {isa = PBXBuildFile; fileRef = R2 /* b.m */; };
\t\tF1 = {isa = PBXBuildFile; fileRef = R1 /* a.m */; };
/* End PBXBuildFile section */
/* Begin PBXFileReference section */
\t\tR1 /* a.m */ = {isa = PBXFileReference; path = a.m; };
\t\tR2 /* b.m */ = {isa = PBXFileReference; path = b.m; };
/* End PBXFileReference section */
/* Begin PBXGroup section */
\t\tG = {isa = PBXGroup; children = (R1 /* a.m */, R2 /* b.m */,); };
/* End PBXGroup section */
";

    fn project(dir: &TempDir, text: &str) -> ProjectFile {
        let bundle = dir.path().join("Demo.xcodeproj");
        fs::create_dir_all(&bundle).expect("mkdir");
        fs::write(bundle.join("project.pbxproj"), text).expect("write");
        ProjectFile {
            name: "Demo".to_string(),
            pbxproj: bundle.join("project.pbxproj"),
            bundle,
        }
    }

    #[test]
    fn unsorted_file_produces_unified_diff() {
        let dir = TempDir::new().expect("tmp");
        let project = project(&dir, UNSORTED);
        let diff = diff_project(&project, &Config::default(), dir.path())
            .expect("diff")
            .expect("some diff");
        assert!(diff
            .unified_diff
            .contains("--- a/Demo.xcodeproj/project.pbxproj"));
        assert!(diff
            .unified_diff
            .contains("+++ b/Demo.xcodeproj/project.pbxproj"));
        assert!(diff.unified_diff.contains("@@"));
        assert!(diff.unified_diff.contains("\n-\t\tF"));
        assert_eq!(
            fs::read_to_string(&project.pbxproj).expect("read"),
            UNSORTED,
            "diff must not write"
        );
    }

    #[test]
    fn sorted_file_has_no_diff() {
        let dir = TempDir::new().expect("tmp");
        let sorted = UNSORTED.replacen("F2 = {isa = PBXBuildFile; fileRef = R2 /* b.m */; };\n\t\tF1 = {isa = PBXBuildFile; fileRef = R1 /* a.m */; };", "F1 = {isa = PBXBuildFile; fileRef = R1 /* a.m */; };\n\t\tF2 = {isa = PBXBuildFile; fileRef = R2 /* b.m */; };", 1);
        let project = project(&dir, &sorted);
        assert!(diff_project(&project, &Config::default(), dir.path())
            .expect("diff")
            .is_none());
    }
}
