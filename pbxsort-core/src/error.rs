//! Error types for pbxsort-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ObjectId;

/// Fatal errors: the project file cannot be reordered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No `/* Begin <section> section */` marker exists in the text.
    #[error("section {section} not found")]
    SectionNotFound { section: String },

    /// A begin marker exists but the section cannot be delimited.
    #[error("malformed section {section}: {reason}")]
    MalformedSection { section: String, reason: String },

    /// The group tree contains a cycle through `key`.
    #[error("group {key} is its own ancestor; no canonical order exists")]
    CyclicHierarchy { key: ObjectId },
}

/// Recoverable problems found while reordering.
///
/// These never abort a run. The affected record keeps its place after all
/// ordered records instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Diagnostic {
    /// A record in `section` has no leading identifier.
    #[error("unparseable record #{index} in {section}: {excerpt}")]
    UnparseableRecord {
        section: String,
        index: usize,
        excerpt: String,
    },

    /// A build file record has no `fileRef` attribute.
    #[error("build file {build_key} has no fileRef")]
    UnresolvedLink { build_key: ObjectId },

    /// A key is listed as a child of more than one group; only its first
    /// position is kept.
    #[error("{key} is listed under more than one group")]
    DuplicateChild { key: ObjectId },
}

/// Errors from loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the config file.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::Config`].
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
