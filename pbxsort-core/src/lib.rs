//! pbxsort core library: canonical ordering of Xcode `project.pbxproj` sections.
//!
//! The engine derives one canonical order from the project's group tree and
//! rewrites the build-file, file-reference, group and build-phase sections so
//! their records follow it. Everything outside the rewritten section bodies is
//! left byte-for-byte untouched.
//!
//! Public API surface:
//! - [`derive_order`]: group tree → [`Order`]
//! - [`resync`]: rewrite one section to follow an [`Order`]
//! - [`reorder`]: `derive_order` followed by every configured `resync`
//! - [`config`]: optional YAML configuration
//! - [`types`]: identifiers, section kinds, hierarchy nodes

pub mod config;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod links;
pub mod order;
pub mod record;
pub mod resync;
pub mod section;
pub mod types;

mod scanner;

pub use config::Config;
pub use engine::{derive_order, reorder, Reordered};
pub use error::{ConfigError, Diagnostic, EngineError};
pub use resync::resync;
pub use types::{HierarchyNode, ObjectId, Order, SectionKind};
