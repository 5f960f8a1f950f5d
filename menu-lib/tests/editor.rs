//! Editing session tests against the in-memory backend.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use menu_lib::api::InMemoryMenuApi;
use menu_lib::api::MenuApi;
use menu_lib::dnd::DragState;
use menu_lib::dnd::DropPosition;
use menu_lib::error::ApiError;
use menu_lib::model::Menu;
use menu_lib::model::MenuDraft;
use menu_lib::model::MenuId;
use menu_lib::model::MenuPatch;
use menu_lib::tree::flatten;
use menu_lib::{Error, MenuEditor, MoveOutcome};

const ROW: f32 = 40.0;
const TOP: f32 = 5.0;
const MIDDLE: f32 = 20.0;
const BOTTOM: f32 = 38.0;

fn id(raw: i64) -> MenuId {
    MenuId::new(raw)
}

fn fixture() -> Vec<Menu> {
    vec![
        Menu::new(1, "Dashboard").with_path("/").with_icon("home").with_order(0),
        Menu::new(2, "Settings").with_path("/settings").with_icon("cog").with_order(1),
        Menu::new(3, "Users").with_path("/settings/users").with_icon("user").with_parent(2).with_order(0),
        Menu::new(4, "Roles").with_path("/settings/roles").with_icon("key").with_parent(2).with_order(1),
        Menu::new(5, "Audit").with_path("/settings/roles/audit").with_icon("eye").with_parent(4).with_order(0),
        Menu::new(6, "Reports").with_path("/reports").with_icon("chart").with_order(2),
    ]
}

/// Wraps the in-memory backend with failure switches and call counters.
#[derive(Default)]
struct FlakyApi {
    inner: InMemoryMenuApi,
    fail_fetch: AtomicBool,
    fail_reorder: AtomicBool,
    reparent_calls: AtomicUsize,
    reorder_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl FlakyApi {
    fn seeded() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryMenuApi::with_menus(fixture()),
            ..Self::default()
        })
    }

    fn calls(&self) -> (usize, usize) {
        (
            self.reparent_calls.load(Ordering::SeqCst),
            self.reorder_calls.load(Ordering::SeqCst),
        )
    }
}

fn server_error() -> Error {
    Error::Api(ApiError::http(500, "Internal Server Error"))
}

#[async_trait]
impl MenuApi for FlakyApi {
    async fn fetch_all(&self) -> Result<Vec<Menu>, Error> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.inner.fetch_all().await
    }

    async fn fetch_one(&self, id: MenuId) -> Result<Option<Menu>, Error> {
        self.inner.fetch_one(id).await
    }

    async fn apply_reparent(&self, id: MenuId, new_parent: Option<MenuId>) -> Result<Menu, Error> {
        self.reparent_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.apply_reparent(id, new_parent).await
    }

    async fn apply_reorder(
        &self,
        id: MenuId,
        new_index: usize,
        previous_index: Option<i32>,
    ) -> Result<Menu, Error> {
        self.reorder_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reorder.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.inner.apply_reorder(id, new_index, previous_index).await
    }

    async fn create(&self, draft: &MenuDraft) -> Result<Menu, Error> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(draft).await
    }

    async fn update(&self, id: MenuId, patch: &MenuPatch) -> Result<Menu, Error> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: MenuId) -> Result<bool, Error> {
        self.inner.delete(id).await
    }
}

fn child_ids(editor: &MenuEditor, parent: Option<i64>) -> Vec<i64> {
    match parent {
        None => editor.tree().iter().map(|n| n.id().get()).collect(),
        Some(parent) => editor
            .find(id(parent))
            .expect("parent should exist")
            .children
            .iter()
            .map(|n| n.id().get())
            .collect(),
    }
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_load_builds_tree() {
    let editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();
    assert!(!editor.is_stale());
    assert_eq!(child_ids(&editor, None), vec![1, 2, 6]);
    assert_eq!(child_ids(&editor, Some(2)), vec![3, 4]);
    assert_eq!(flatten(editor.tree()).len(), editor.nodes().len());
}

#[tokio::test]
async fn test_failed_refresh_keeps_last_good_list() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();
    let before = editor.tree().to_vec();

    api.fail_fetch.store(true, Ordering::SeqCst);
    assert!(editor.refresh().await.is_err());
    assert!(editor.is_stale());
    assert_eq!(editor.tree(), before.as_slice());

    api.fail_fetch.store(false, Ordering::SeqCst);
    editor.refresh().await.unwrap();
    assert!(!editor.is_stale());
}

// =============================================================================
// Gestures
// =============================================================================

#[tokio::test]
async fn test_drag_before_sibling() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();

    editor.begin_drag(id(4));
    let hover = editor.hover(id(3), TOP, ROW);
    assert_eq!(hover.position, Some(DropPosition::Before));
    assert!(hover.changed);

    let outcome = editor.drop_dragged().await.unwrap();
    let MoveOutcome::Moved(plan) = outcome else {
        panic!("expected a move, got {:?}", outcome);
    };
    assert_eq!(plan.new_parent_id, Some(id(2)));
    assert_eq!(plan.new_index, 0);
    assert!(!plan.parent_changed);

    // Same parent: only the reorder call goes out.
    assert_eq!(api.calls(), (0, 1));
    assert_eq!(child_ids(&editor, Some(2)), vec![4, 3]);
    assert_eq!(editor.drag_state(), DragState::Idle);
}

#[tokio::test]
async fn test_drag_inside_reparents_as_last_child() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();

    editor.begin_drag(id(6));
    assert_eq!(editor.hover(id(2), MIDDLE, ROW).position, Some(DropPosition::Inside));
    let outcome = editor.drop_dragged().await.unwrap();

    assert!(matches!(outcome, MoveOutcome::Moved(plan) if plan.parent_changed && plan.new_index == 2));
    assert_eq!(api.calls(), (1, 1));
    assert_eq!(child_ids(&editor, None), vec![1, 2]);
    assert_eq!(child_ids(&editor, Some(2)), vec![3, 4, 6]);
}

#[tokio::test]
async fn test_drag_after_target_in_other_parent() {
    let mut editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();

    editor.begin_drag(id(1));
    editor.hover(id(5), BOTTOM, ROW);
    editor.drop_dragged().await.unwrap();

    assert_eq!(child_ids(&editor, None), vec![2, 6]);
    assert_eq!(child_ids(&editor, Some(4)), vec![5, 1]);
}

#[tokio::test]
async fn test_drop_into_own_subtree_is_ignored() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();
    let before = editor.nodes().to_vec();

    editor.begin_drag(id(2));
    editor.hover(id(5), MIDDLE, ROW);
    assert_eq!(editor.drop_dragged().await.unwrap(), MoveOutcome::Ignored);

    editor.begin_drag(id(2));
    assert_eq!(editor.hover(id(2), MIDDLE, ROW).position, None);
    assert_eq!(editor.drop_on(id(2)).await.unwrap(), MoveOutcome::Ignored);

    assert_eq!(api.calls(), (0, 0));
    assert_eq!(editor.nodes(), before.as_slice());
    assert!(!editor.is_stale());
}

#[tokio::test]
async fn test_release_outside_rows_is_ignored() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();

    editor.begin_drag(id(3));
    editor.hover(id(1), MIDDLE, ROW);
    editor.leave_target();
    assert_eq!(editor.drop_dragged().await.unwrap(), MoveOutcome::Ignored);
    assert_eq!(api.calls(), (0, 0));
}

#[tokio::test]
async fn test_drop_on_row_without_hover_defaults_to_after() {
    let mut editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();

    editor.begin_drag(id(1));
    let outcome = editor.drop_on(id(6)).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::Moved(plan) if plan.new_index == 2));
    assert_eq!(child_ids(&editor, None), vec![2, 6, 1]);
}

#[tokio::test]
async fn test_drop_at_root_appends() {
    let mut editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();

    editor.begin_drag(id(5));
    editor.drop_at_root().await.unwrap();
    assert_eq!(child_ids(&editor, None), vec![1, 2, 6, 5]);
    assert!(editor.find(id(4)).unwrap().children.is_empty());
}

#[tokio::test]
async fn test_identity_move_sends_nothing() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();

    let outcome = editor
        .move_node(id(3), Some(id(4)), DropPosition::Before)
        .await
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(api.calls(), (0, 0));
}

#[tokio::test]
async fn test_stale_ids_are_ignored() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();

    let outcome = editor
        .move_node(id(99), Some(id(1)), DropPosition::Inside)
        .await
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Ignored);
    let outcome = editor
        .move_node(id(1), Some(id(99)), DropPosition::After)
        .await
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Ignored);
    assert_eq!(api.calls(), (0, 0));
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_failed_commit_reverts_to_last_good_tree() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();
    let before = editor.tree().to_vec();

    api.fail_reorder.store(true, Ordering::SeqCst);
    let err = editor
        .move_node(id(6), Some(id(3)), DropPosition::Inside)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(500));

    // The reparent went through, the reorder did not; the view stays on the
    // pre-move state until the next refetch.
    assert_eq!(api.calls(), (1, 1));
    assert!(editor.is_stale());
    assert_eq!(editor.tree(), before.as_slice());

    api.fail_reorder.store(false, Ordering::SeqCst);
    editor.refresh().await.unwrap();
    assert_eq!(child_ids(&editor, Some(3)), vec![6]);
}

// =============================================================================
// Expand/collapse
// =============================================================================

#[tokio::test]
async fn test_expanded_set_survives_moves() {
    let mut editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();

    editor.toggle_expanded(id(2));
    assert_eq!(editor.visible_rows().len(), 5);

    editor
        .move_node(id(1), Some(id(4)), DropPosition::Inside)
        .await
        .unwrap();
    assert!(editor.expanded().is_expanded(id(2)));

    editor.expand_all();
    assert_eq!(editor.expanded().len(), flatten(editor.tree()).len());
    assert_eq!(editor.visible_rows().len(), 6);

    editor.collapse_all();
    assert_eq!(editor.visible_rows().len(), 2);
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_invalid_create_never_reaches_backend() {
    let api = FlakyApi::seeded();
    let mut editor = MenuEditor::load(Arc::clone(&api)).await.unwrap();

    let err = editor
        .create(&MenuDraft::child_of(id(2)).title("Groups").path("groups"))
        .await
        .unwrap_err();
    let Error::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.get("path"), Some("Path must start with /"));
    assert_eq!(errors.get("icon"), Some("Icon is required"));
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_update_delete_refresh_tree() {
    let mut editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();

    let groups = editor
        .create(
            &MenuDraft::child_of(id(2))
                .title("Groups")
                .path("/settings/groups")
                .icon("users")
                .order_index(5),
        )
        .await
        .unwrap();
    assert_eq!(child_ids(&editor, Some(2)), vec![3, 4, groups.id.get()]);

    editor
        .update(groups.id, &MenuPatch::new().title("Teams"))
        .await
        .unwrap();
    assert_eq!(editor.find(groups.id).unwrap().menu.title, "Teams");

    editor.expand_all();
    assert!(editor.delete(id(2)).await.unwrap());
    assert_eq!(child_ids(&editor, None), vec![1, 6]);
    assert!(!editor.expanded().is_expanded(id(2)));
    assert!(!editor.expanded().is_expanded(id(5)));
}

#[tokio::test]
async fn test_backend_rejects_cycle_through_update() {
    let mut editor = MenuEditor::load(FlakyApi::seeded()).await.unwrap();
    let err = editor
        .update(id(2), &MenuPatch::new().parent(Some(id(5))))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}
