//! Menu node as stored by the backend

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::MenuId;

/// A single menu item in its flat, persisted form.
///
/// The only relationship fields are `parent_id` and `order_index`; the nested
/// view is always derived from them (see [`crate::tree`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    /// Unique id.
    pub id: MenuId,
    /// Display title.
    pub title: String,
    /// Route the item links to.
    pub path: String,
    /// Icon name.
    pub icon: String,
    /// Whether the item is shown in the navigation.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Sibling order, ascending. Not required to be contiguous.
    #[serde(default)]
    pub order_index: i32,
    /// Parent id, `None` for root level items.
    #[serde(default)]
    pub parent_id: Option<MenuId>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Menu {
    /// Creates an active menu item with empty path and icon.
    ///
    /// Mostly useful for building fixtures.
    pub fn new(id: impl Into<MenuId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path: String::new(),
            icon: String::new(),
            is_active: true,
            order_index: 0,
            parent_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the parent id.
    pub fn with_parent(mut self, parent: impl Into<MenuId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Sets the sibling order.
    pub fn with_order(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Sets the path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Returns `true` if this item sits at root level.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
