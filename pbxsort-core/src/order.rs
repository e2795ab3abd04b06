//! Order flattener: group index → canonical [`Order`].
//!
//! Each root is expanded depth-first. Child stubs that name a group are
//! replaced by that group's fully expanded subtree; other stubs stay leaves.
//! The result is a fresh tree; the [`Hierarchy`] is never mutated.

use std::collections::{HashMap, HashSet};

use crate::error::{Diagnostic, EngineError};
use crate::hierarchy::Hierarchy;
use crate::types::{HierarchyNode, ObjectId, Order};

/// Expands the tree under a single root.
///
/// # Errors
/// [`EngineError::CyclicHierarchy`] if a group is reached again while it is
/// still being expanded.
pub fn flatten(root: &ObjectId, hierarchy: &Hierarchy) -> Result<HierarchyNode, EngineError> {
    Flattener::new(hierarchy).visit(root)
}

/// Expands every root and concatenates the trees into an [`Order`].
///
/// The whole group index is checked for cycles first, including groups that
/// no root reaches (a pure cycle has no root at all).
pub fn flatten_all(hierarchy: &Hierarchy) -> Result<(Order, Vec<Diagnostic>), EngineError> {
    check_acyclic(hierarchy)?;

    let mut flattener = Flattener::new(hierarchy);
    let mut roots = Vec::new();
    for root in hierarchy.roots() {
        roots.push(flattener.visit(root)?);
    }
    Ok((
        Order {
            roots,
            ..Order::default()
        },
        flattener.diagnostics,
    ))
}

struct Flattener<'h> {
    hierarchy: &'h Hierarchy,
    in_progress: HashSet<ObjectId>,
    emitted: HashSet<ObjectId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'h> Flattener<'h> {
    fn new(hierarchy: &'h Hierarchy) -> Self {
        Self {
            hierarchy,
            in_progress: HashSet::new(),
            emitted: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    fn visit(&mut self, key: &ObjectId) -> Result<HierarchyNode, EngineError> {
        let hierarchy = self.hierarchy;
        let Some(group) = hierarchy.get(key.as_str()) else {
            return Ok(HierarchyNode::leaf(key.clone(), None, None));
        };
        self.in_progress.insert(key.clone());
        self.emitted.insert(key.clone());

        let mut children = Vec::with_capacity(group.children.len());
        for stub in &group.children {
            if self.in_progress.contains(&stub.key) {
                return Err(EngineError::CyclicHierarchy {
                    key: stub.key.clone(),
                });
            }
            if !self.emitted.insert(stub.key.clone()) {
                tracing::warn!(key = %stub.key, "child listed under more than one group");
                self.diagnostics.push(Diagnostic::DuplicateChild {
                    key: stub.key.clone(),
                });
                continue;
            }
            if hierarchy.is_group(stub.key.as_str()) {
                let mut subtree = self.visit(&stub.key)?;
                if subtree.name.is_none() {
                    subtree.name = stub.name.clone();
                }
                children.push(subtree);
            } else {
                children.push(stub.clone());
            }
        }

        self.in_progress.remove(key);
        Ok(HierarchyNode {
            key: group.key.clone(),
            name: group.name.clone(),
            build_key: group.build_key.clone(),
            children,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Three-colour depth-first search over every group.
fn check_acyclic(hierarchy: &Hierarchy) -> Result<(), EngineError> {
    fn walk<'h>(
        key: &'h ObjectId,
        hierarchy: &'h Hierarchy,
        marks: &mut HashMap<&'h ObjectId, Mark>,
    ) -> Result<(), EngineError> {
        match marks.get(key) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(EngineError::CyclicHierarchy { key: key.clone() });
            }
            None => {}
        }
        let Some(group) = hierarchy.get(key.as_str()) else {
            return Ok(());
        };
        marks.insert(key, Mark::Visiting);
        for child in &group.children {
            if hierarchy.is_group(child.key.as_str()) {
                walk(&child.key, hierarchy, marks)?;
            }
        }
        marks.insert(key, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    for key in hierarchy.keys() {
        walk(key, hierarchy, &mut marks)?;
    }
    Ok(())
}
