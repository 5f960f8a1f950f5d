//! Reparent/reorder planning

use serde::Deserialize;
use serde::Serialize;

use crate::model::Menu;
use crate::model::MenuId;
use crate::tree::MenuIndex;

use super::DropPosition;

/// The outcome of a drop, expressed against the flat list.
///
/// The planner only describes the move; persisting it is left to the
/// [`crate::commit::MoveCommitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    /// The node being moved.
    pub dragged: MenuId,
    /// Parent after the move, `None` for root level.
    pub new_parent_id: Option<MenuId>,
    /// 0-based position among the new siblings, not counting the node itself.
    pub new_index: usize,
    /// Whether a reparent call is needed before the reorder call.
    pub parent_changed: bool,
    /// The node's stored `order_index` before the move.
    pub previous_index: i32,
    /// The node's 0-based position among its current siblings.
    pub current_index: usize,
}

impl MovePlan {
    /// Returns `true` if applying this plan would not change anything.
    pub fn is_identity(&self) -> bool {
        !self.parent_changed && self.new_index == self.current_index
    }
}

/// Plans moving `dragged` relative to `target`.
///
/// `target = None` drops at the end of the root level. Returns `None` when
/// there is nothing to do:
///
/// - `dragged` or `target` is not in `nodes` (stale reference),
/// - `target` is `dragged` itself,
/// - `target` lies inside the subtree of `dragged`, which would create a
///   cycle.
///
/// # Examples
///
/// ```
/// use menu_lib::dnd::{plan_move, DropPosition};
/// use menu_lib::model::{Menu, MenuId};
///
/// let nodes = vec![
///     Menu::new(1, "Root"),
///     Menu::new(2, "A").with_parent(1).with_order(0),
///     Menu::new(3, "B").with_parent(1).with_order(1),
/// ];
///
/// let plan = plan_move(MenuId::new(3), Some(MenuId::new(2)), DropPosition::Before, &nodes).unwrap();
/// assert_eq!(plan.new_parent_id, Some(MenuId::new(1)));
/// assert_eq!(plan.new_index, 0);
/// assert!(!plan.parent_changed);
///
/// assert!(plan_move(MenuId::new(1), Some(MenuId::new(2)), DropPosition::Inside, &nodes).is_none());
/// ```
pub fn plan_move(
    dragged: MenuId,
    target: Option<MenuId>,
    position: DropPosition,
    nodes: &[Menu],
) -> Option<MovePlan> {
    let index = MenuIndex::new(nodes);
    plan_move_in(&index, dragged, target, position)
}

/// Same as [`plan_move`] over an existing index.
pub fn plan_move_in(
    index: &MenuIndex<'_>,
    dragged: MenuId,
    target: Option<MenuId>,
    position: DropPosition,
) -> Option<MovePlan> {
    let Some(dragged_menu) = index.get(dragged) else {
        log::debug!("Dragged menu {} no longer exists, ignoring drop", dragged);
        return None;
    };

    let target_menu = match target {
        Some(target) if target == dragged => return None,
        Some(target) => {
            let Some(target_menu) = index.get(target) else {
                log::debug!("Drop target {} no longer exists, ignoring drop", target);
                return None;
            };
            if index.is_descendant(target, dragged) {
                log::debug!("Refusing to move {} into its own subtree ({})", dragged, target);
                return None;
            }
            Some(target_menu)
        }
        None => None,
    };

    let new_parent_id = match (target_menu, position) {
        (Some(target), DropPosition::Inside) => Some(target.id),
        (Some(target), _) => index.effective_parent(target),
        (None, _) => None,
    };

    let siblings: Vec<&Menu> = index
        .children_of(new_parent_id)
        .into_iter()
        .filter(|menu| menu.id != dragged)
        .collect();

    let new_index = match (target_menu, position) {
        (Some(target), DropPosition::Before) => siblings.iter().position(|m| m.id == target.id)?,
        (Some(target), DropPosition::After) => {
            siblings.iter().position(|m| m.id == target.id)? + 1
        }
        (Some(_), DropPosition::Inside) | (None, _) => siblings.len(),
    };

    let plan = MovePlan {
        dragged,
        new_parent_id,
        new_index,
        parent_changed: new_parent_id != dragged_menu.parent_id,
        previous_index: dragged_menu.order_index,
        current_index: index.sibling_position(dragged).unwrap_or(0),
    };
    log::debug!("Planned move: {:?}", plan);
    Some(plan)
}
