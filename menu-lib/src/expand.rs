//! Expand/collapse state
//!
//! Kept apart from the tree so it survives rebuilds; ids are stable across
//! refetches.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::MenuId;
use crate::tree::TreeNode;
use crate::tree::collect_ids;

/// Set of node ids whose children are shown.
///
/// Leaf ids may be members; they are simply never rendered as expandable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedSet {
    ids: HashSet<MenuId>,
}

impl ExpandedSet {
    /// Creates an empty set (everything collapsed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set with every node of `tree` expanded.
    pub fn all(tree: &[TreeNode]) -> Self {
        let mut set = Self::new();
        set.expand_all(tree);
        set
    }

    /// Flips `id` and returns whether it is now expanded.
    pub fn toggle(&mut self, id: MenuId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn expand(&mut self, id: MenuId) {
        self.ids.insert(id);
    }

    pub fn collapse(&mut self, id: MenuId) {
        self.ids.remove(&id);
    }

    pub fn is_expanded(&self, id: MenuId) -> bool {
        self.ids.contains(&id)
    }

    /// Expands every node of `tree`, replacing the current contents.
    pub fn expand_all(&mut self, tree: &[TreeNode]) {
        self.ids = collect_ids(tree).into_iter().collect();
    }

    pub fn collapse_all(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that are no longer part of `tree`.
    pub fn retain_existing(&mut self, tree: &[TreeNode]) {
        let present: HashSet<MenuId> = collect_ids(tree).into_iter().collect();
        self.ids.retain(|id| present.contains(id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MenuId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<MenuId> for ExpandedSet {
    fn from_iter<I: IntoIterator<Item = MenuId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// A row as a tree view would display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: MenuId,
    /// Indentation level, 0 for roots.
    pub depth: usize,
    /// Whether the row offers the expand/collapse toggle.
    pub has_children: bool,
    pub expanded: bool,
}

/// Returns the rows currently visible, in display order.
pub fn visible_rows(tree: &[TreeNode], expanded: &ExpandedSet) -> Vec<VisibleRow> {
    fn walk(nodes: &[TreeNode], depth: usize, expanded: &ExpandedSet, out: &mut Vec<VisibleRow>) {
        for node in nodes {
            let is_expanded = expanded.is_expanded(node.id());
            out.push(VisibleRow {
                id: node.id(),
                depth,
                has_children: node.has_children(),
                expanded: is_expanded,
            });
            if is_expanded {
                walk(&node.children, depth + 1, expanded, out);
            }
        }
    }

    let mut rows = Vec::new();
    walk(tree, 0, expanded, &mut rows);
    rows
}
