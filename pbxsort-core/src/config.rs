//! Optional YAML configuration.
//!
//! # Lookup order
//!
//! 1. An explicit path (`--config`).
//! 2. `.pbxsort.yaml` in the search root.
//! 3. `<config_dir>/pbxsort/config.yaml` (`dirs::config_dir()`).
//! 4. [`Config::default`].
//!
//! # API pattern
//!
//! [`Config::discover_at`] takes the user config directory explicitly and is
//! what tests call; [`Config::discover`] derives it from `dirs`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::SectionKind;

/// File name looked up in the search root.
pub const LOCAL_CONFIG_FILE: &str = ".pbxsort.yaml";

/// Settings for discovery and reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Sections to resync. Applied in [`SectionKind::ALL`] sequence whatever
    /// order they are listed in.
    pub sections: Vec<SectionKind>,
    /// Fail a project whose frameworks/resources/sources section is missing,
    /// instead of skipping that section.
    pub require_build_phases: bool,
    /// Search subdirectories for `.xcodeproj` bundles.
    pub recursive: bool,
    /// Depth limit for recursive search.
    pub max_depth: usize,
    /// Directory names never descended into.
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sections: SectionKind::ALL.to_vec(),
            require_build_phases: false,
            recursive: false,
            max_depth: 8,
            exclude: vec![
                "Pods".to_string(),
                "Carthage".to_string(),
                "DerivedData".to_string(),
                ".git".to_string(),
            ],
        }
    }
}

impl Config {
    /// Loads and parses the YAML file at `path`.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolves the config for `root`, with `user_dir` standing in for
    /// `dirs::config_dir()`.
    pub fn discover_at(
        root: &Path,
        explicit: Option<&Path>,
        user_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_at(path);
        }
        let candidates = [
            Some(root.join(LOCAL_CONFIG_FILE)),
            user_dir.map(|dir| dir.join("pbxsort").join("config.yaml")),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load_at(&path);
            }
        }
        Ok(Self::default())
    }

    /// [`Config::discover_at`] using the platform config directory.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let user_dir: Option<PathBuf> = dirs::config_dir();
        Self::discover_at(root, explicit, user_dir.as_deref())
    }

    /// Configured sections in application sequence, without duplicates.
    pub fn sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|kind| self.sections.contains(kind))
            .collect()
    }
}
