//! In-process menu backend

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::MenuApi;
use crate::error::Error;
use crate::model::Menu;
use crate::model::MenuDraft;
use crate::model::MenuId;
use crate::model::MenuPatch;
use crate::tree::MenuIndex;
use crate::validation::validate_draft;
use crate::validation::validate_patch;

/// A [`MenuApi`] backed by a mutex-guarded list.
///
/// Behaves like the REST backend: ids are assigned sequentially, reparenting
/// rejects cycles, reordering renumbers siblings contiguously and deleting
/// removes the whole subtree. Useful for tests and offline use.
///
/// # Example
///
/// ```
/// use menu_lib::api::{InMemoryMenuApi, MenuApi};
/// use menu_lib::model::MenuDraft;
///
/// # tokio_test_block(async {
/// let api = InMemoryMenuApi::new();
/// let home = api
///     .create(&MenuDraft::new().title("Home").path("/").icon("house"))
///     .await
///     .unwrap();
/// assert_eq!(api.fetch_all().await.unwrap(), vec![home]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMenuApi {
    table: Mutex<Table>,
}

#[derive(Debug, Default)]
struct Table {
    menus: Vec<Menu>,
    next_id: i64,
}

impl Table {
    fn position(&self, id: MenuId) -> Result<usize, Error> {
        self.menus
            .iter()
            .position(|menu| menu.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn check_parent(&self, id: Option<MenuId>, parent: Option<MenuId>) -> Result<(), Error> {
        let Some(parent) = parent else {
            return Ok(());
        };
        let index = MenuIndex::new(&self.menus);
        if !index.contains(parent) {
            return Err(Error::NotFound(parent));
        }
        if let Some(id) = id {
            if parent == id || index.is_descendant(parent, id) {
                return Err(Error::Conflict(format!(
                    "Menu {} cannot be moved under its own descendant {}",
                    id, parent
                )));
            }
        }
        Ok(())
    }

    /// Returns an `order_index` that sorts after every current child of
    /// `parent`. When the largest index is already `i32::MAX` the siblings
    /// are renumbered from 0 first.
    fn next_order(&mut self, id: MenuId, parent: Option<MenuId>) -> i32 {
        let mut siblings: Vec<usize> = (0..self.menus.len())
            .filter(|&pos| self.menus[pos].id != id && self.menus[pos].parent_id == parent)
            .collect();
        match siblings.iter().map(|&pos| self.menus[pos].order_index).max() {
            None => 0,
            Some(last) if last < i32::MAX => last + 1,
            Some(_) => {
                siblings.sort_by_key(|&pos| self.menus[pos].order_index);
                let now = Utc::now();
                for (slot, &pos) in siblings.iter().enumerate() {
                    let menu = &mut self.menus[pos];
                    menu.order_index = slot as i32;
                    menu.updated_at = Some(now);
                }
                log::debug!("Renumbered {} child(ren) of {:?} to make room", siblings.len(), parent);
                siblings.len() as i32
            }
        }
    }
}

impl InMemoryMenuApi {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `menus`.
    ///
    /// New ids continue after the largest existing one.
    pub fn with_menus(menus: Vec<Menu>) -> Self {
        let next_id = menus.iter().map(|menu| menu.id.get()).max().unwrap_or(0);
        Self {
            table: Mutex::new(Table { menus, next_id }),
        }
    }

    /// Returns the number of stored items.
    pub async fn len(&self) -> usize {
        self.table.lock().await.menus.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.table.lock().await.menus.is_empty()
    }
}

#[async_trait]
impl MenuApi for InMemoryMenuApi {
    async fn fetch_all(&self) -> Result<Vec<Menu>, Error> {
        Ok(self.table.lock().await.menus.clone())
    }

    async fn fetch_one(&self, id: MenuId) -> Result<Option<Menu>, Error> {
        let table = self.table.lock().await;
        Ok(table.menus.iter().find(|menu| menu.id == id).cloned())
    }

    async fn apply_reparent(&self, id: MenuId, new_parent: Option<MenuId>) -> Result<Menu, Error> {
        let mut table = self.table.lock().await;
        let pos = table.position(id)?;
        if table.menus[pos].parent_id == new_parent {
            return Ok(table.menus[pos].clone());
        }
        table.check_parent(Some(id), new_parent)?;

        let order_index = table.next_order(id, new_parent);
        let menu = &mut table.menus[pos];
        menu.parent_id = new_parent;
        menu.order_index = order_index;
        menu.updated_at = Some(Utc::now());
        Ok(menu.clone())
    }

    async fn apply_reorder(
        &self,
        id: MenuId,
        new_index: usize,
        previous_index: Option<i32>,
    ) -> Result<Menu, Error> {
        let mut table = self.table.lock().await;
        let pos = table.position(id)?;

        let mut order: Vec<MenuId> = {
            let index = MenuIndex::new(&table.menus);
            let parent = index.effective_parent(&table.menus[pos]);
            index
                .children_of(parent)
                .into_iter()
                .map(|menu| menu.id)
                .filter(|&sibling| sibling != id)
                .collect()
        };
        let new_index = new_index.min(order.len());
        order.insert(new_index, id);

        let now = Utc::now();
        let mut touched = 0;
        for (slot, sibling) in order.iter().enumerate() {
            let slot = slot as i32;
            let sibling_pos = table.position(*sibling)?;
            let menu = &mut table.menus[sibling_pos];
            if menu.order_index != slot {
                menu.order_index = slot;
                menu.updated_at = Some(now);
                touched += 1;
            }
        }
        log::debug!(
            "Reordered menu {} to {} (was {:?}), {} sibling(s) renumbered",
            id,
            new_index,
            previous_index,
            touched
        );

        Ok(table.menus[pos].clone())
    }

    async fn create(&self, draft: &MenuDraft) -> Result<Menu, Error> {
        validate_draft(draft)?;
        let mut table = self.table.lock().await;
        table.check_parent(None, draft.parent_id)?;

        table.next_id += 1;
        let now = Utc::now();
        let menu = Menu {
            id: MenuId::new(table.next_id),
            title: draft.title.clone(),
            path: draft.path.clone(),
            icon: draft.icon.clone(),
            is_active: draft.is_active,
            order_index: draft.order_index,
            parent_id: draft.parent_id,
            created_at: Some(now),
            updated_at: Some(now),
        };
        table.menus.push(menu.clone());
        Ok(menu)
    }

    async fn update(&self, id: MenuId, patch: &MenuPatch) -> Result<Menu, Error> {
        validate_patch(patch)?;
        let mut table = self.table.lock().await;
        let pos = table.position(id)?;
        if let Some(parent) = patch.parent_id {
            table.check_parent(Some(id), parent)?;
        }

        let menu = &mut table.menus[pos];
        patch.apply_to(menu);
        menu.updated_at = Some(Utc::now());
        Ok(menu.clone())
    }

    async fn delete(&self, id: MenuId) -> Result<bool, Error> {
        let mut table = self.table.lock().await;
        table.position(id)?;

        let doomed: Vec<MenuId> = {
            let index = MenuIndex::new(&table.menus);
            index
                .iter()
                .filter(|menu| menu.id == id || index.is_descendant(menu.id, id))
                .map(|menu| menu.id)
                .collect()
        };
        table.menus.retain(|menu| !doomed.contains(&menu.id));
        log::debug!("Deleted menu {} and {} descendant(s)", id, doomed.len() - 1);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> MenuId {
        MenuId::new(raw)
    }

    fn seeded() -> InMemoryMenuApi {
        InMemoryMenuApi::with_menus(vec![
            Menu::new(1, "Root"),
            Menu::new(2, "A").with_parent(1).with_order(0),
            Menu::new(3, "B").with_parent(1).with_order(1),
            Menu::new(4, "C").with_parent(1).with_order(2),
            Menu::new(5, "A1").with_parent(2).with_order(0),
        ])
    }

    async fn child_titles(api: &InMemoryMenuApi, parent: i64) -> Vec<String> {
        let menus = api.fetch_all().await.unwrap();
        let index = MenuIndex::new(&menus);
        index
            .children_of(Some(id(parent)))
            .into_iter()
            .map(|menu| menu.title.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_reorder_renumbers_only_what_moved() {
        let api = seeded();
        api.apply_reorder(id(4), 0, Some(2)).await.unwrap();
        assert_eq!(child_titles(&api, 1).await, vec!["C", "A", "B"]);

        let menus = api.fetch_all().await.unwrap();
        let orders: Vec<_> = menus.iter().map(|m| (m.id.get(), m.order_index)).collect();
        assert!(orders.contains(&(4, 0)));
        assert!(orders.contains(&(2, 1)));
        assert!(orders.contains(&(3, 2)));
        assert!(orders.contains(&(5, 0)));
    }

    #[tokio::test]
    async fn test_reorder_clamps_index() {
        let api = seeded();
        api.apply_reorder(id(2), 99, None).await.unwrap();
        assert_eq!(child_titles(&api, 1).await, vec!["B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_reparent_appends_and_rejects_cycles() {
        let api = seeded();
        let moved = api.apply_reparent(id(4), Some(id(2))).await.unwrap();
        assert_eq!(moved.parent_id, Some(id(2)));
        assert_eq!(child_titles(&api, 2).await, vec!["A1", "C"]);

        let err = api.apply_reparent(id(2), Some(id(5))).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let err = api.apply_reparent(id(2), Some(id(2))).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let err = api.apply_reparent(id(2), Some(id(77))).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(missing) if missing == id(77)));
    }

    #[tokio::test]
    async fn test_reparent_under_parent_with_max_order_index() {
        let api = InMemoryMenuApi::with_menus(vec![
            Menu::new(1, "Root").with_order(0),
            Menu::new(2, "Last").with_parent(1).with_order(i32::MAX),
            Menu::new(3, "First").with_parent(1).with_order(-5),
            Menu::new(4, "Moved").with_order(1),
        ]);

        let moved = api.apply_reparent(id(4), Some(id(1))).await.unwrap();
        assert_eq!(moved.order_index, 2);
        assert_eq!(child_titles(&api, 1).await, vec!["First", "Last", "Moved"]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let api = seeded();
        let created = api
            .create(&MenuDraft::child_of(id(5)).title("Deep").path("/deep").icon("x"))
            .await
            .unwrap();
        assert_eq!(created.id, id(6));

        let err = api.create(&MenuDraft::new()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let updated = api
            .update(created.id, &MenuPatch::new().title("Deeper").active(false))
            .await
            .unwrap();
        assert_eq!(updated.title, "Deeper");
        assert!(!updated.is_active);

        assert!(api.delete(id(2)).await.unwrap());
        assert_eq!(api.len().await, 3);
        assert!(api.fetch_one(id(6)).await.unwrap().is_none());
        assert!(matches!(api.delete(id(2)).await, Err(Error::NotFound(_))));
    }
}
