//! Create and update payloads

use serde::Deserialize;
use serde::Serialize;

use super::Menu;
use super::MenuId;

/// Fields for creating a new menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDraft {
    pub title: String,
    pub path: String,
    pub icon: String,
    pub is_active: bool,
    pub order_index: i32,
    pub parent_id: Option<MenuId>,
}

impl Default for MenuDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            path: String::new(),
            icon: String::new(),
            is_active: true,
            order_index: 0,
            parent_id: None,
        }
    }
}

impl MenuDraft {
    /// Creates an empty draft at root level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty draft pre-filled to become a child of `parent`.
    pub fn child_of(parent: MenuId) -> Self {
        Self {
            parent_id: Some(parent),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn order_index(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    pub fn parent(mut self, parent_id: Option<MenuId>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

impl From<&Menu> for MenuDraft {
    fn from(menu: &Menu) -> Self {
        Self {
            title: menu.title.clone(),
            path: menu.path.clone(),
            icon: menu.icon.clone(),
            is_active: menu.is_active,
            order_index: menu.order_index,
            parent_id: menu.parent_id,
        }
    }
}

/// Partial update of a menu item. Absent fields are left untouched.
///
/// `parent_id` is doubly optional: `Some(None)` moves the item to root level,
/// `None` leaves the parent as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub parent_id: Option<Option<MenuId>>,
}

impl MenuPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn order_index(mut self, order_index: i32) -> Self {
        self.order_index = Some(order_index);
        self
    }

    pub fn parent(mut self, parent_id: Option<MenuId>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.path.is_none()
            && self.icon.is_none()
            && self.is_active.is_none()
            && self.order_index.is_none()
            && self.parent_id.is_none()
    }

    /// Applies the set fields to `menu`.
    pub fn apply_to(&self, menu: &mut Menu) {
        if let Some(title) = &self.title {
            menu.title = title.clone();
        }
        if let Some(path) = &self.path {
            menu.path = path.clone();
        }
        if let Some(icon) = &self.icon {
            menu.icon = icon.clone();
        }
        if let Some(is_active) = self.is_active {
            menu.is_active = is_active;
        }
        if let Some(order_index) = self.order_index {
            menu.order_index = order_index;
        }
        if let Some(parent_id) = self.parent_id {
            menu.parent_id = parent_id;
        }
    }
}

// `null` on the wire means "move to root", a missing key means "unchanged".
mod double_option {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;

    use crate::model::MenuId;

    pub fn serialize<S: Serializer>(
        value: &Option<Option<MenuId>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<MenuId>>, D::Error> {
        Option::<MenuId>::deserialize(deserializer).map(Some)
    }
}
