//! Flat arena over a menu list

use std::collections::HashMap;
use std::collections::HashSet;

use crate::model::Menu;
use crate::model::MenuId;

/// Id-keyed view over a flat menu list.
///
/// The list stays the single source of truth; the index only borrows it. All
/// relationship queries go through `parent_id`/`order_index`, so there are no
/// parent/child object references to keep in sync.
///
/// When an id occurs more than once the first occurrence wins and later ones
/// are ignored.
///
/// Stored parent cycles are broken at construction: of each cycle, the
/// member that comes first in input order is treated as a root. The tree
/// builder and the move planner both read parents through this index, so they
/// agree on where such nodes live.
#[derive(Debug, Clone)]
pub struct MenuIndex<'a> {
    nodes: Vec<&'a Menu>,
    by_id: HashMap<MenuId, &'a Menu>,
    cycle_roots: HashSet<MenuId>,
}

impl<'a> MenuIndex<'a> {
    /// Indexes `nodes`, keeping input order.
    pub fn new(nodes: &'a [Menu]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());
        for menu in nodes {
            if by_id.contains_key(&menu.id) {
                log::warn!("Duplicate menu id {} ignored", menu.id);
                continue;
            }
            by_id.insert(menu.id, menu);
            unique.push(menu);
        }
        let cycle_roots = find_cycle_roots(&unique, &by_id);
        Self {
            nodes: unique,
            by_id,
            cycle_roots,
        }
    }

    /// Returns the number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    pub fn get(&self, id: MenuId) -> Option<&'a Menu> {
        self.by_id.get(&id).copied()
    }

    /// Returns `true` if a node with `id` exists.
    pub fn contains(&self, id: MenuId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Iterates the distinct nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Menu> + '_ {
        self.nodes.iter().copied()
    }

    /// Returns the parent a node is displayed under.
    ///
    /// A `parent_id` pointing at a missing node (or at the node itself) is a
    /// data inconsistency; such nodes are treated as roots, as are the nodes
    /// chosen to break a stored parent cycle.
    pub fn effective_parent(&self, menu: &Menu) -> Option<MenuId> {
        if self.cycle_roots.contains(&menu.id) {
            return None;
        }
        stored_parent(menu, &self.by_id)
    }

    /// Returns `true` if `menu` has a stored parent that is missing or is the
    /// node itself.
    pub fn is_orphan(&self, menu: &Menu) -> bool {
        menu.parent_id.is_some() && stored_parent(menu, &self.by_id).is_none()
    }

    /// Returns `true` if `menu` is shown as a root to break a parent cycle.
    pub fn is_cycle_root(&self, id: MenuId) -> bool {
        self.cycle_roots.contains(&id)
    }

    /// Returns the children of `parent` (`None` = roots) ordered by
    /// `order_index`, ties kept in input order.
    pub fn children_of(&self, parent: Option<MenuId>) -> Vec<&'a Menu> {
        let mut children: Vec<&'a Menu> = self
            .nodes
            .iter()
            .copied()
            .filter(|menu| self.effective_parent(menu) == parent)
            .collect();
        children.sort_by_key(|menu| menu.order_index);
        children
    }

    /// Returns the 0-based position of `id` among its siblings.
    pub fn sibling_position(&self, id: MenuId) -> Option<usize> {
        let menu = self.get(id)?;
        self.children_of(self.effective_parent(menu))
            .iter()
            .position(|sibling| sibling.id == id)
    }

    /// Returns `true` if `ancestor` appears on the parent chain of `candidate`.
    ///
    /// The walk is bounded by the node count, so it terminates even when the
    /// stored parent links already contain a cycle. A node is not its own
    /// descendant.
    pub fn is_descendant(&self, candidate: MenuId, ancestor: MenuId) -> bool {
        let Some(mut current) = self.get(candidate) else {
            return false;
        };
        for _ in 0..self.len() {
            let Some(parent) = self.effective_parent(current) else {
                return false;
            };
            if parent == ancestor {
                return true;
            }
            match self.get(parent) {
                Some(next) => current = next,
                None => return false,
            }
        }
        log::warn!("Parent chain of menu {} does not terminate", candidate);
        false
    }
}

fn stored_parent(menu: &Menu, by_id: &HashMap<MenuId, &Menu>) -> Option<MenuId> {
    match menu.parent_id {
        Some(parent) if parent != menu.id && by_id.contains_key(&parent) => Some(parent),
        _ => None,
    }
}

/// Picks one node per stored parent cycle to be shown as a root.
///
/// Cycles are found from the first unreachable node in input order; of each
/// cycle, the member that comes first in input order is picked.
fn find_cycle_roots(nodes: &[&Menu], by_id: &HashMap<MenuId, &Menu>) -> HashSet<MenuId> {
    let position: HashMap<MenuId, usize> =
        nodes.iter().enumerate().map(|(i, menu)| (menu.id, i)).collect();
    let mut children: HashMap<MenuId, Vec<MenuId>> = HashMap::new();
    let mut stack = Vec::new();
    for menu in nodes {
        match stored_parent(menu, by_id) {
            Some(parent) => children.entry(parent).or_default().push(menu.id),
            None => stack.push(menu.id),
        }
    }

    let mut reached = HashSet::with_capacity(nodes.len());
    let mut cycle_roots = HashSet::new();
    let mut next = 0;
    loop {
        while let Some(id) = stack.pop() {
            if reached.insert(id) {
                stack.extend(children.get(&id).into_iter().flatten().copied());
            }
        }
        if reached.len() == nodes.len() {
            break;
        }
        while reached.contains(&nodes[next].id) {
            next += 1;
        }

        // Everything above an unreachable node is unreachable too, so its
        // parent chain ends in a cycle.
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = nodes[next].id;
        while seen.insert(current) {
            chain.push(current);
            match by_id.get(&current).and_then(|menu| stored_parent(menu, by_id)) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        let cycle_start = chain.iter().position(|&id| id == current).unwrap_or(0);
        let root = chain[cycle_start..]
            .iter()
            .copied()
            .min_by_key(|id| position.get(id).copied().unwrap_or(usize::MAX))
            .unwrap_or(current);

        log::warn!("Menu {} is part of a parent cycle, showing it at root level", root);
        cycle_roots.insert(root);
        stack.push(root);
    }
    cycle_roots
}
