pub mod check;
pub mod diff;
pub mod order;
pub mod sort;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pbxsort_core::Config;

/// Path and discovery options shared by `sort`, `check` and `diff`.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Directory to search, `.xcodeproj` bundle, or `project.pbxproj` file.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Search subdirectories for projects.
    #[arg(long, short)]
    pub recursive: bool,

    /// YAML config file (default: .pbxsort.yaml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl TargetArgs {
    /// Resolves the config for this target, with `--recursive` applied on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = discover_config(&self.path, self.config.as_deref())?;
        config.recursive |= self.recursive;
        tracing::debug!(?config, "effective configuration");
        Ok(config)
    }
}

/// Loads `explicit`, or the config discovered next to `path`.
pub(crate) fn discover_config(path: &Path, explicit: Option<&Path>) -> Result<Config> {
    Config::discover(&config_root(path), explicit).context("failed to load configuration")
}

/// Directory searched for `.pbxsort.yaml`: the path itself, or the directory
/// holding the bundle when the path names a bundle or a project file.
fn config_root(path: &Path) -> PathBuf {
    let bundle = path
        .ancestors()
        .find(|p| p.extension().is_some_and(|ext| ext == "xcodeproj"));
    match bundle.and_then(Path::parent) {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

/// `path` relative to `base` for display, or unchanged if not below it.
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_root_for_bundle_paths_is_the_bundle_parent() {
        assert_eq!(
            config_root(Path::new("/work/Demo.xcodeproj/project.pbxproj")),
            PathBuf::from("/work")
        );
        assert_eq!(config_root(Path::new("Demo.xcodeproj")), PathBuf::from("."));
        assert_eq!(config_root(Path::new("/work/ios")), PathBuf::from("/work/ios"));
    }
}
