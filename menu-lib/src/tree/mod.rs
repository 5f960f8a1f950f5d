//! Nested tree view derived from the flat menu list
//!
//! The tree is rebuilt from scratch whenever the flat list changes and is
//! never patched in place.
//!
//! # Example
//!
//! ```
//! use menu_lib::model::{Menu, MenuId};
//! use menu_lib::tree::{build_tree, find_by_id, flatten};
//!
//! let nodes = vec![
//!     Menu::new(1, "Dashboard"),
//!     Menu::new(2, "Reports").with_parent(1).with_order(1),
//!     Menu::new(3, "Overview").with_parent(1).with_order(0),
//! ];
//!
//! let tree = build_tree(&nodes);
//! assert_eq!(tree.len(), 1);
//! assert_eq!(tree[0].children[0].menu.title, "Overview");
//! assert_eq!(flatten(&tree).len(), 3);
//! assert!(find_by_id(&tree, MenuId::new(2)).is_some());
//! ```

mod index;

pub use index::MenuIndex;

use std::collections::HashMap;

use serde::Serialize;

use crate::model::Menu;
use crate::model::MenuId;

/// A menu item together with its ordered children.
///
/// Serializes as the menu's fields plus a `children` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub menu: Menu,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Returns the id of this node.
    pub fn id(&self) -> MenuId {
        self.menu.id
    }

    /// Returns `true` if this node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }
}

/// Builds the nested tree from a flat list.
///
/// Each sibling group is sorted by `order_index` ascending, ties kept in
/// input order. Nodes whose parent is missing become roots, and so does one
/// member of each stored parent cycle (see [`MenuIndex`]), so every node is
/// shown exactly once.
pub fn build_tree(nodes: &[Menu]) -> Vec<TreeNode> {
    let index = MenuIndex::new(nodes);

    let mut groups: HashMap<Option<MenuId>, Vec<&Menu>> = HashMap::new();
    for menu in index.iter() {
        if index.is_orphan(menu) {
            log::warn!(
                "Menu {} has invalid parent {:?}, showing it at root level",
                menu.id,
                menu.parent_id
            );
        }
        groups.entry(index.effective_parent(menu)).or_default().push(menu);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|menu| menu.order_index);
    }

    attach_children(None, &groups)
}

fn attach_children(
    parent: Option<MenuId>,
    groups: &HashMap<Option<MenuId>, Vec<&Menu>>,
) -> Vec<TreeNode> {
    groups
        .get(&parent)
        .into_iter()
        .flatten()
        .map(|menu| TreeNode {
            menu: (*menu).clone(),
            children: attach_children(Some(menu.id), groups),
        })
        .collect()
}

/// Returns every node in pre-order.
pub fn flatten(tree: &[TreeNode]) -> Vec<&Menu> {
    let mut out = Vec::new();
    fn walk<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a Menu>) {
        for node in nodes {
            out.push(&node.menu);
            walk(&node.children, out);
        }
    }
    walk(tree, &mut out);
    out
}

/// Returns every id in pre-order.
pub fn collect_ids(tree: &[TreeNode]) -> Vec<MenuId> {
    flatten(tree).into_iter().map(|menu| menu.id).collect()
}

/// Finds a node by id, depth first.
pub fn find_by_id(tree: &[TreeNode], id: MenuId) -> Option<&TreeNode> {
    for node in tree {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Returns the ids of all nodes beneath `id`, in pre-order.
///
/// Empty if `id` is a leaf or is not in the tree.
pub fn descendant_ids(tree: &[TreeNode], id: MenuId) -> Vec<MenuId> {
    find_by_id(tree, id)
        .map(|node| collect_ids(&node.children))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(menus: &[&Menu]) -> Vec<i64> {
        menus.iter().map(|m| m.id.get()).collect()
    }

    fn sample() -> Vec<Menu> {
        vec![
            Menu::new(10, "Settings").with_order(2),
            Menu::new(1, "Dashboard").with_order(0),
            Menu::new(3, "Users").with_parent(10).with_order(1),
            Menu::new(2, "Profile").with_parent(10).with_order(0),
            Menu::new(4, "Roles").with_parent(3),
            Menu::new(5, "Reports").with_order(1),
        ]
    }

    fn assert_sorted(nodes: &[TreeNode]) {
        for pair in nodes.windows(2) {
            assert!(pair[0].menu.order_index <= pair[1].menu.order_index);
        }
        for node in nodes {
            assert_sorted(&node.children);
        }
    }

    #[test]
    fn test_build_tree_nesting_and_order() {
        let tree = build_tree(&sample());
        let roots: Vec<_> = tree.iter().map(|n| n.id().get()).collect();
        assert_eq!(roots, vec![1, 5, 10]);

        let settings = find_by_id(&tree, MenuId::new(10)).unwrap();
        let children: Vec<_> = settings.children.iter().map(|n| n.id().get()).collect();
        assert_eq!(children, vec![2, 3]);
        assert_eq!(settings.subtree_len(), 4);
        assert_sorted(&tree);
    }

    #[test]
    fn test_flatten_pre_order() {
        let tree = build_tree(&sample());
        assert_eq!(ids(&flatten(&tree)), vec![1, 5, 10, 2, 3, 4]);
    }

    #[test]
    fn test_flatten_is_permutation() {
        let nodes = sample();
        let tree = build_tree(&nodes);
        let mut flat = ids(&flatten(&tree));
        let mut original: Vec<_> = nodes.iter().map(|m| m.id.get()).collect();
        flat.sort();
        original.sort();
        assert_eq!(flat, original);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let nodes = vec![
            Menu::new(1, "Root").with_order(1),
            Menu::new(2, "Lost").with_parent(404).with_order(0),
        ];
        let tree = build_tree(&nodes);
        let roots: Vec<_> = tree.iter().map(|n| n.id().get()).collect();
        assert_eq!(roots, vec![2, 1]);
    }

    #[test]
    fn test_cycle_still_yields_every_node_once() {
        let nodes = vec![
            Menu::new(1, "root"),
            Menu::new(2, "a").with_parent(3),
            Menu::new(3, "b").with_parent(2),
            Menu::new(4, "self").with_parent(4),
        ];
        let tree = build_tree(&nodes);
        let mut flat = ids(&flatten(&tree));
        flat.sort();
        assert_eq!(flat, vec![1, 2, 3, 4]);

        let roots: Vec<_> = tree.iter().map(|n| n.id().get()).collect();
        assert_eq!(roots, vec![1, 2, 4]);
        let cycle_root = find_by_id(&tree, MenuId::new(2)).unwrap();
        assert_eq!(cycle_root.children[0].id(), MenuId::new(3));
    }

    #[test]
    fn test_find_and_descendants() {
        let tree = build_tree(&sample());
        assert!(find_by_id(&tree, MenuId::new(99)).is_none());
        let below: Vec<_> = descendant_ids(&tree, MenuId::new(10))
            .into_iter()
            .map(MenuId::get)
            .collect();
        assert_eq!(below, vec![2, 3, 4]);
        assert!(descendant_ids(&tree, MenuId::new(4)).is_empty());
    }

    #[test]
    fn test_serializes_nested() {
        let tree = build_tree(&sample());
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[2]["id"], 10);
        assert_eq!(json[2]["children"][1]["title"], "Users");
        assert_eq!(json[2]["children"][1]["children"][0]["id"], 4);
        assert_eq!(json[0]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_empty() {
        assert!(build_tree(&[]).is_empty());
        assert!(flatten(&[]).is_empty());
    }
}
