//! Menu form validation and parent selection

use crate::error::ValidationErrors;
use crate::model::Menu;
use crate::model::MenuDraft;
use crate::model::MenuId;
use crate::model::MenuPatch;
use crate::tree::build_tree;
use crate::tree::TreeNode;

fn check_title(title: &str, errors: &mut ValidationErrors) {
    if title.trim().is_empty() {
        errors.push("title", "Title is required");
    }
}

fn check_path(path: &str, errors: &mut ValidationErrors) {
    if path.trim().is_empty() {
        errors.push("path", "Path is required");
    } else if !path.starts_with('/') {
        errors.push("path", "Path must start with /");
    }
}

fn check_icon(icon: &str, errors: &mut ValidationErrors) {
    if icon.trim().is_empty() {
        errors.push("icon", "Icon is required");
    }
}

/// Validates a create form.
///
/// # Examples
///
/// ```
/// use menu_lib::model::MenuDraft;
/// use menu_lib::validation::validate_draft;
///
/// let draft = MenuDraft::new().title("Reports").path("reports").icon("chart");
/// let errors = validate_draft(&draft).unwrap_err();
/// assert_eq!(errors.get("path"), Some("Path must start with /"));
/// ```
pub fn validate_draft(draft: &MenuDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_title(&draft.title, &mut errors);
    check_path(&draft.path, &mut errors);
    check_icon(&draft.icon, &mut errors);
    errors.into_result()
}

/// Validates an edit form. Only fields present in the patch are checked.
pub fn validate_patch(patch: &MenuPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(title) = &patch.title {
        check_title(title, &mut errors);
    }
    if let Some(path) = &patch.path {
        check_path(path, &mut errors);
    }
    if let Some(icon) = &patch.icon {
        check_icon(icon, &mut errors);
    }
    errors.into_result()
}

/// Returns the nodes that may become the parent of `editing`, in tree order.
///
/// The edited node and its whole subtree are excluded, since choosing any of
/// them would create a cycle. With `editing = None` (a new item) every node
/// is available.
pub fn available_parents(nodes: &[Menu], editing: Option<MenuId>) -> Vec<Menu> {
    fn walk(tree: &[TreeNode], editing: Option<MenuId>, out: &mut Vec<Menu>) {
        for node in tree {
            if Some(node.id()) == editing {
                continue;
            }
            out.push(node.menu.clone());
            walk(&node.children, editing, out);
        }
    }

    let mut out = Vec::new();
    walk(&build_tree(nodes), editing, &mut out);
    out
}
