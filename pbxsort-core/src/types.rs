//! Domain types shared by every stage of the engine.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// An object identifier as it appears in the project file (usually 24 hex
/// digits, but any token is accepted).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for ObjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Section kinds
// ---------------------------------------------------------------------------

/// The sections the engine knows how to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    BuildFile,
    FileReference,
    FrameworksBuildPhase,
    Group,
    ResourcesBuildPhase,
    SourcesBuildPhase,
}

impl SectionKind {
    /// Every kind, in the sequence resyncs are applied to a file.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::BuildFile,
        SectionKind::FileReference,
        SectionKind::FrameworksBuildPhase,
        SectionKind::Group,
        SectionKind::ResourcesBuildPhase,
        SectionKind::SourcesBuildPhase,
    ];

    /// The name used in the section's `Begin`/`End` markers.
    pub fn section_name(self) -> &'static str {
        match self {
            SectionKind::BuildFile => "PBXBuildFile",
            SectionKind::FileReference => "PBXFileReference",
            SectionKind::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            SectionKind::Group => "PBXGroup",
            SectionKind::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            SectionKind::SourcesBuildPhase => "PBXSourcesBuildPhase",
        }
    }

    /// Build-phase sections hold whole phase records; only the `files = (...)`
    /// list inside each record is reordered.
    pub fn is_build_phase(self) -> bool {
        matches!(
            self,
            SectionKind::FrameworksBuildPhase
                | SectionKind::ResourcesBuildPhase
                | SectionKind::SourcesBuildPhase
        )
    }

    /// Whether records of this kind are filed under build-file keys.
    pub fn uses_build_keys(self) -> bool {
        self == SectionKind::BuildFile || self.is_build_phase()
    }

    /// The identifier a record of this kind is filed under for `node`.
    ///
    /// File references and groups use the node's own key; build files and
    /// build-phase entries use the build identifier wrapping it.
    pub fn match_key(self, node: &HierarchyNode) -> Option<&ObjectId> {
        match self {
            SectionKind::FileReference | SectionKind::Group => Some(&node.key),
            SectionKind::BuildFile
            | SectionKind::FrameworksBuildPhase
            | SectionKind::ResourcesBuildPhase
            | SectionKind::SourcesBuildPhase => node.build_key.as_ref(),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// One entry of the group tree: a group, or a leaf file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    /// Reference identifier (group or file reference key).
    pub key: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Build file wrapping this reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_key: Option<ObjectId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(key: ObjectId, name: Option<String>, build_key: Option<ObjectId>) -> Self {
        Self {
            key,
            name,
            build_key,
            children: Vec::new(),
        }
    }
}

/// The canonical order: one fully expanded tree per root group, roots in
/// order of first appearance in the group section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Order {
    pub roots: Vec<HierarchyNode>,
    /// Build files with no resolvable file reference. Their records, and the
    /// build-phase entries naming them, keep their original slot.
    #[serde(skip)]
    pub unlinked: BTreeSet<ObjectId>,
}

impl Order {
    /// Depth-first, parent-before-children walk over every node.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Keys in canonical sequence.
    pub fn keys(&self) -> impl Iterator<Item = &ObjectId> {
        self.iter().map(|node| &node.key)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Iterator returned by [`Order::iter`].
pub struct Preorder<'a> {
    stack: Vec<&'a HierarchyNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a HierarchyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
