//! Editing session: ties the tree, drag gesture and backend together.

use std::sync::Arc;

use crate::api::MenuApi;
use crate::commit::CommitOutcome;
use crate::commit::MoveCommitter;
use crate::dnd::DragIntent;
use crate::dnd::DragState;
use crate::dnd::DropPosition;
use crate::dnd::DropResolver;
use crate::dnd::Hover;
use crate::dnd::MovePlan;
use crate::dnd::plan_move;
use crate::error::Error;
use crate::expand::ExpandedSet;
use crate::expand::VisibleRow;
use crate::expand::visible_rows;
use crate::model::Menu;
use crate::model::MenuDraft;
use crate::model::MenuId;
use crate::model::MenuPatch;
use crate::tree::TreeNode;
use crate::tree::build_tree;
use crate::tree::find_by_id;
use crate::validation::validate_draft;
use crate::validation::validate_patch;

/// Result of a drop or an explicit move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Invalid or stale move (self-drop, drop into own subtree, unknown id,
    /// released outside any row). Nothing was sent.
    Ignored,
    /// The move would leave everything where it is. Nothing was sent.
    Unchanged,
    /// The move was persisted.
    Moved(MovePlan),
}

/// A menu editing session.
///
/// Holds the last successfully fetched flat list and the tree derived from
/// it. The list is only ever replaced by a fetch, never patched optimistically,
/// so a failed commit leaves the view on the last known-good state.
///
/// # Example
///
/// ```ignore
/// let mut editor = MenuEditor::load(client).await?;
///
/// editor.begin_drag(reports_id);
/// editor.hover(settings_id, 18.0, 40.0);
/// match editor.drop_dragged().await {
///     Ok(MoveOutcome::Moved(plan)) => println!("moved under {:?}", plan.new_parent_id),
///     Ok(_) => {}
///     Err(e) => eprintln!("Failed to move menu: {e}"),
/// }
/// ```
pub struct MenuEditor {
    api: Arc<dyn MenuApi>,
    committer: MoveCommitter,
    nodes: Vec<Menu>,
    tree: Vec<TreeNode>,
    expanded: ExpandedSet,
    drag: DragState,
    resolver: DropResolver,
    stale: bool,
}

impl MenuEditor {
    /// Creates an empty session. Call [`MenuEditor::refresh`] to populate it.
    pub fn new(api: impl MenuApi + 'static) -> Self {
        Self::with_shared(Arc::new(api))
    }

    /// Creates an empty session over a shared backend handle.
    pub fn with_shared(api: Arc<dyn MenuApi>) -> Self {
        Self {
            committer: MoveCommitter::new(Arc::clone(&api)),
            api,
            nodes: Vec::new(),
            tree: Vec::new(),
            expanded: ExpandedSet::new(),
            drag: DragState::Idle,
            resolver: DropResolver::new(),
            stale: true,
        }
    }

    /// Creates a session and performs the initial fetch.
    pub async fn load(api: impl MenuApi + 'static) -> Result<Self, Error> {
        let mut editor = Self::new(api);
        editor.refresh().await?;
        Ok(editor)
    }

    /// Refetches the flat list and rebuilds the tree.
    ///
    /// On failure the previous list and tree are kept and the session stays
    /// stale.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        match self.api.fetch_all().await {
            Ok(nodes) => {
                self.nodes = nodes;
                self.rebuild();
                self.stale = false;
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to fetch menus: {}", err);
                self.stale = true;
                Err(err)
            }
        }
    }

    fn rebuild(&mut self) {
        self.tree = build_tree(&self.nodes);
    }

    /// Refreshes after a successful mutation. A failed fetch here does not
    /// undo the mutation, so it is only logged.
    async fn refresh_after_mutation(&mut self) {
        self.stale = true;
        if let Err(err) = self.refresh().await {
            log::warn!("Change was saved but the menu list could not be reloaded: {}", err);
        }
    }

    /// The last successfully fetched flat list.
    pub fn nodes(&self) -> &[Menu] {
        &self.nodes
    }

    /// The tree derived from [`MenuEditor::nodes`].
    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn find(&self, id: MenuId) -> Option<&TreeNode> {
        find_by_id(&self.tree, id)
    }

    /// Returns `true` when the displayed list may differ from the backend,
    /// e.g. after a failed fetch or commit.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns `true` while a move is being committed.
    pub fn is_busy(&self) -> bool {
        self.committer.is_busy()
    }

    // -------------------------------------------------------------------------
    // Expand/collapse
    // -------------------------------------------------------------------------

    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    pub fn expanded_mut(&mut self) -> &mut ExpandedSet {
        &mut self.expanded
    }

    pub fn toggle_expanded(&mut self, id: MenuId) -> bool {
        self.expanded.toggle(id)
    }

    pub fn expand_all(&mut self) {
        self.expanded.expand_all(&self.tree);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.collapse_all();
    }

    /// Rows to display given the current expansion.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        visible_rows(&self.tree, &self.expanded)
    }

    // -------------------------------------------------------------------------
    // Drag and drop
    // -------------------------------------------------------------------------

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Starts dragging `id`.
    pub fn begin_drag(&mut self, id: MenuId) {
        self.resolver.reset();
        self.drag = self.drag.begin(id);
    }

    /// Pointer moved over the row of `target`.
    ///
    /// `offset_y` is measured from the top of the row. Only transient drag
    /// state is touched; nothing is persisted until a drop.
    pub fn hover(&mut self, target: MenuId, offset_y: f32, row_height: f32) -> Hover {
        let Some(dragged) = self.drag.dragged() else {
            return Hover {
                position: None,
                changed: false,
            };
        };
        let hover = self.resolver.hover(dragged, target, offset_y, row_height);
        self.drag = self.drag.hover(target, hover.position);
        hover
    }

    /// Pointer left the hovered row.
    pub fn leave_target(&mut self) {
        self.resolver.reset();
        self.drag = self.drag.leave();
    }

    pub fn cancel_drag(&mut self) {
        self.resolver.reset();
        self.drag = self.drag.cancel();
    }

    /// Releases the dragged node at the last hovered position.
    pub async fn drop_dragged(&mut self) -> Result<MoveOutcome, Error> {
        let (state, intent) = self.drag.drop();
        self.finish_drop(state, intent).await
    }

    /// Releases the dragged node onto the row of `target`.
    pub async fn drop_on(&mut self, target: MenuId) -> Result<MoveOutcome, Error> {
        let (state, intent) = self.drag.drop_on(target);
        self.finish_drop(state, intent).await
    }

    /// Releases the dragged node below the last root.
    pub async fn drop_at_root(&mut self) -> Result<MoveOutcome, Error> {
        let (state, intent) = self.drag.drop_at_root();
        self.finish_drop(state, intent).await
    }

    async fn finish_drop(
        &mut self,
        state: DragState,
        intent: Option<DragIntent>,
    ) -> Result<MoveOutcome, Error> {
        self.drag = state;
        self.resolver.reset();
        match intent {
            Some(intent) => self.move_node(intent.dragged, intent.target, intent.position).await,
            None => Ok(MoveOutcome::Ignored),
        }
    }

    /// Moves `dragged` relative to `target` and persists the change.
    ///
    /// Invalid and stale moves are silently ignored. On a persistence failure
    /// the tree is rebuilt from the last known-good list, the session is
    /// marked stale and the error is returned for the caller to report.
    pub async fn move_node(
        &mut self,
        dragged: MenuId,
        target: Option<MenuId>,
        position: DropPosition,
    ) -> Result<MoveOutcome, Error> {
        let Some(plan) = plan_move(dragged, target, position, &self.nodes) else {
            return Ok(MoveOutcome::Ignored);
        };

        match self.committer.commit(&plan).await {
            Ok(CommitOutcome::Skipped) => Ok(MoveOutcome::Unchanged),
            Ok(CommitOutcome::Applied(_)) => {
                self.refresh_after_mutation().await;
                Ok(MoveOutcome::Moved(plan))
            }
            Err(Error::CommitInFlight) => Err(Error::CommitInFlight),
            Err(err) => {
                log::warn!("Failed to move menu {}: {}", dragged, err);
                self.stale = true;
                self.rebuild();
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // CRUD
    // -------------------------------------------------------------------------

    /// Validates and creates a menu item, then reloads the list.
    pub async fn create(&mut self, draft: &MenuDraft) -> Result<Menu, Error> {
        validate_draft(draft)?;
        let menu = self.api.create(draft).await?;
        log::info!("Created menu {} '{}'", menu.id, menu.title);
        self.refresh_after_mutation().await;
        Ok(menu)
    }

    /// Validates and applies `patch`, then reloads the list.
    pub async fn update(&mut self, id: MenuId, patch: &MenuPatch) -> Result<Menu, Error> {
        validate_patch(patch)?;
        let menu = self.api.update(id, patch).await?;
        log::info!("Updated menu {}", id);
        self.refresh_after_mutation().await;
        Ok(menu)
    }

    /// Deletes `id` with its subtree, then reloads the list.
    pub async fn delete(&mut self, id: MenuId) -> Result<bool, Error> {
        let deleted = self.api.delete(id).await?;
        log::info!("Deleted menu {}", id);
        self.refresh_after_mutation().await;
        self.expanded.retain_existing(&self.tree);
        Ok(deleted)
    }
}

impl std::fmt::Debug for MenuEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuEditor")
            .field("nodes", &self.nodes.len())
            .field("expanded", &self.expanded.len())
            .field("drag", &self.drag)
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}
