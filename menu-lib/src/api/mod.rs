//! Data-access layer
//!
//! The editor only ever talks to a [`MenuApi`]. [`crate::MenuClient`] speaks
//! the REST protocol; [`InMemoryMenuApi`] keeps everything in process.

mod memory;

pub use memory::*;

use async_trait::async_trait;

use crate::error::Error;
use crate::model::Menu;
use crate::model::MenuDraft;
use crate::model::MenuId;
use crate::model::MenuPatch;

/// Operations the editor needs from the backend.
///
/// Reparent and reorder are separate calls: a move that changes the parent
/// issues [`MenuApi::apply_reparent`] first and [`MenuApi::apply_reorder`]
/// second, because the reorder index is relative to the new parent.
#[async_trait]
pub trait MenuApi: Send + Sync {
    /// Returns every menu item, including inactive ones, as a flat list.
    async fn fetch_all(&self) -> Result<Vec<Menu>, Error>;

    /// Returns a single menu item, `None` if it does not exist.
    async fn fetch_one(&self, id: MenuId) -> Result<Option<Menu>, Error>;

    /// Changes only the parent of `id`.
    async fn apply_reparent(&self, id: MenuId, new_parent: Option<MenuId>) -> Result<Menu, Error>;

    /// Moves `id` to position `new_index` among its siblings.
    ///
    /// `previous_index` is the item's `order_index` before the move; backends
    /// may use it to only shift the siblings in between.
    async fn apply_reorder(
        &self,
        id: MenuId,
        new_index: usize,
        previous_index: Option<i32>,
    ) -> Result<Menu, Error>;

    /// Creates a menu item.
    async fn create(&self, draft: &MenuDraft) -> Result<Menu, Error>;

    /// Updates the given fields of a menu item.
    async fn update(&self, id: MenuId, patch: &MenuPatch) -> Result<Menu, Error>;

    /// Deletes a menu item together with its descendants.
    async fn delete(&self, id: MenuId) -> Result<bool, Error>;
}

#[async_trait]
impl<T: MenuApi + ?Sized> MenuApi for std::sync::Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<Menu>, Error> {
        (**self).fetch_all().await
    }

    async fn fetch_one(&self, id: MenuId) -> Result<Option<Menu>, Error> {
        (**self).fetch_one(id).await
    }

    async fn apply_reparent(&self, id: MenuId, new_parent: Option<MenuId>) -> Result<Menu, Error> {
        (**self).apply_reparent(id, new_parent).await
    }

    async fn apply_reorder(
        &self,
        id: MenuId,
        new_index: usize,
        previous_index: Option<i32>,
    ) -> Result<Menu, Error> {
        (**self).apply_reorder(id, new_index, previous_index).await
    }

    async fn create(&self, draft: &MenuDraft) -> Result<Menu, Error> {
        (**self).create(draft).await
    }

    async fn update(&self, id: MenuId, patch: &MenuPatch) -> Result<Menu, Error> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: MenuId) -> Result<bool, Error> {
        (**self).delete(id).await
    }
}
