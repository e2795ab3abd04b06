//! Hierarchy builder: group records + links → group index.

use std::collections::{HashMap, HashSet};

use crate::links::LinkMap;
use crate::record::GroupRecord;
use crate::types::{HierarchyNode, ObjectId};

/// Every group, keyed by reference identifier, with its children as stubs.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: HashMap<ObjectId, HierarchyNode>,
    /// Group keys in order of first appearance.
    appearance: Vec<ObjectId>,
    parent_ids: HashSet<ObjectId>,
    child_ids: HashSet<ObjectId>,
}

impl Hierarchy {
    /// Builds the index from extracted group records.
    ///
    /// A group key that occurs twice keeps its first record.
    pub fn build(groups: Vec<GroupRecord>, links: &LinkMap) -> Self {
        let mut hierarchy = Hierarchy::default();

        for group in groups {
            if hierarchy.nodes.contains_key(&group.key) {
                tracing::warn!(key = %group.key, "duplicate group record ignored");
                continue;
            }
            let children: Vec<HierarchyNode> = group
                .children
                .into_iter()
                .map(|child| {
                    let build_key = links.get(child.key.as_str()).cloned();
                    HierarchyNode::leaf(child.key, child.name, build_key)
                })
                .collect();

            hierarchy
                .child_ids
                .extend(children.iter().map(|c| c.key.clone()));
            hierarchy.parent_ids.insert(group.key.clone());
            hierarchy.appearance.push(group.key.clone());

            let build_key = links.get(group.key.as_str()).cloned();
            hierarchy.nodes.insert(
                group.key.clone(),
                HierarchyNode {
                    key: group.key,
                    name: group.name,
                    build_key,
                    children,
                },
            );
        }

        hierarchy
    }

    /// Groups never listed as another group's child, in appearance order.
    pub fn roots(&self) -> Vec<&ObjectId> {
        self.appearance
            .iter()
            .filter(|key| !self.child_ids.contains(*key))
            .collect()
    }

    /// All group keys in appearance order.
    pub fn keys(&self) -> &[ObjectId] {
        &self.appearance
    }

    pub fn get(&self, key: &str) -> Option<&HierarchyNode> {
        self.nodes.get(key)
    }

    pub fn is_group(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn parent_ids(&self) -> &HashSet<ObjectId> {
        &self.parent_ids
    }

    pub fn child_ids(&self) -> &HashSet<ObjectId> {
        &self.child_ids
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
