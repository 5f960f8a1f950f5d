//! Drag gesture state machine

use serde::Deserialize;
use serde::Serialize;

use crate::model::MenuId;

use super::DropPosition;

/// What the user asked for when releasing a dragged node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragIntent {
    pub dragged: MenuId,
    /// `None` drops at the end of the root level.
    pub target: Option<MenuId>,
    pub position: DropPosition,
}

/// State of the single active drag gesture.
///
/// Transitions are pure: every method consumes the state and returns the next
/// one, so a gesture can be replayed in tests without any UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        dragged: MenuId,
    },
    Hovering {
        dragged: MenuId,
        target: MenuId,
        position: DropPosition,
    },
}

impl DragState {
    /// Starts dragging `dragged`, abandoning any gesture in progress.
    pub fn begin(self, dragged: MenuId) -> Self {
        Self::Dragging { dragged }
    }

    /// Records the pointer over `target`.
    ///
    /// Hovering the dragged node itself, or a row where no position resolved,
    /// drops back to [`DragState::Dragging`]. Has no effect while idle.
    pub fn hover(self, target: MenuId, position: Option<DropPosition>) -> Self {
        let Some(dragged) = self.dragged() else {
            return self;
        };
        match position {
            Some(position) if target != dragged => Self::Hovering {
                dragged,
                target,
                position,
            },
            _ => Self::Dragging { dragged },
        }
    }

    /// The pointer left the hovered row.
    pub fn leave(self) -> Self {
        match self {
            Self::Hovering { dragged, .. } => Self::Dragging { dragged },
            other => other,
        }
    }

    /// Releases the node wherever the pointer currently is.
    ///
    /// Only a hovered target yields an intent; releasing outside any row ends
    /// the gesture without one.
    pub fn drop(self) -> (Self, Option<DragIntent>) {
        (Self::Idle, self.intent())
    }

    /// Releases the node onto `target` as reported by the row itself.
    ///
    /// Uses the hovered position when it was recorded for that row, and
    /// falls back to [`DropPosition::After`] otherwise.
    pub fn drop_on(self, target: MenuId) -> (Self, Option<DragIntent>) {
        let intent = match self {
            Self::Idle => None,
            Self::Dragging { dragged } | Self::Hovering { dragged, .. } if dragged == target => {
                None
            }
            Self::Hovering {
                dragged,
                target: hovered,
                position,
            } if hovered == target => Some(DragIntent {
                dragged,
                target: Some(target),
                position,
            }),
            Self::Dragging { dragged } | Self::Hovering { dragged, .. } => Some(DragIntent {
                dragged,
                target: Some(target),
                position: DropPosition::After,
            }),
        };
        (Self::Idle, intent)
    }

    /// Releases the node on the empty area below the tree: end of root level.
    pub fn drop_at_root(self) -> (Self, Option<DragIntent>) {
        let intent = self.dragged().map(|dragged| DragIntent {
            dragged,
            target: None,
            position: DropPosition::After,
        });
        (Self::Idle, intent)
    }

    /// Aborts the gesture.
    pub fn cancel(self) -> Self {
        Self::Idle
    }

    /// Returns the node being dragged, if any.
    pub fn dragged(&self) -> Option<MenuId> {
        match *self {
            Self::Idle => None,
            Self::Dragging { dragged } | Self::Hovering { dragged, .. } => Some(dragged),
        }
    }

    /// Returns the intent a drop would produce right now.
    pub fn intent(&self) -> Option<DragIntent> {
        match *self {
            Self::Hovering {
                dragged,
                target,
                position,
            } => Some(DragIntent {
                dragged,
                target: Some(target),
                position,
            }),
            _ => None,
        }
    }

    /// Returns `true` while a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: MenuId = MenuId::new(1);
    const B: MenuId = MenuId::new(2);
    const C: MenuId = MenuId::new(3);

    #[test]
    fn test_full_gesture() {
        let state = DragState::default();
        assert!(!state.is_active());

        let state = state.begin(A);
        assert_eq!(state, DragState::Dragging { dragged: A });

        let state = state.hover(B, Some(DropPosition::Inside));
        assert_eq!(
            state.intent(),
            Some(DragIntent {
                dragged: A,
                target: Some(B),
                position: DropPosition::Inside
            })
        );

        let (state, intent) = state.drop();
        assert_eq!(state, DragState::Idle);
        assert_eq!(intent.unwrap().target, Some(B));
    }

    #[test]
    fn test_self_hover_suppressed() {
        let state = DragState::Idle
            .begin(A)
            .hover(B, Some(DropPosition::Before))
            .hover(A, Some(DropPosition::Inside));
        assert_eq!(state, DragState::Dragging { dragged: A });
        let (_, intent) = state.drop();
        assert!(intent.is_none());
    }

    #[test]
    fn test_hover_without_position() {
        let state = DragState::Idle.begin(A).hover(B, None);
        assert_eq!(state, DragState::Dragging { dragged: A });
    }

    #[test]
    fn test_idle_ignores_hover_and_drop() {
        let state = DragState::Idle.hover(B, Some(DropPosition::After));
        assert_eq!(state, DragState::Idle);
        assert_eq!(state.drop(), (DragState::Idle, None));
        assert_eq!(state.drop_on(B), (DragState::Idle, None));
        assert_eq!(state.drop_at_root(), (DragState::Idle, None));
    }

    #[test]
    fn test_leave_and_cancel() {
        let state = DragState::Idle.begin(A).hover(B, Some(DropPosition::After));
        assert_eq!(state.leave(), DragState::Dragging { dragged: A });
        assert_eq!(state.cancel(), DragState::Idle);
        assert_eq!(DragState::Idle.leave(), DragState::Idle);
    }

    #[test]
    fn test_drop_on_row() {
        let hovering = DragState::Idle.begin(A).hover(B, Some(DropPosition::Before));

        let (_, intent) = hovering.drop_on(B);
        assert_eq!(intent.unwrap().position, DropPosition::Before);

        // Released over a row that never reported a hover position.
        let (_, intent) = hovering.drop_on(C);
        let intent = intent.unwrap();
        assert_eq!(intent.target, Some(C));
        assert_eq!(intent.position, DropPosition::After);

        let (_, intent) = hovering.drop_on(A);
        assert!(intent.is_none());
    }

    #[test]
    fn test_drop_at_root() {
        let (state, intent) = DragState::Idle.begin(C).drop_at_root();
        assert_eq!(state, DragState::Idle);
        assert_eq!(
            intent,
            Some(DragIntent {
                dragged: C,
                target: None,
                position: DropPosition::After
            })
        );
    }

    #[test]
    fn test_begin_restarts() {
        let state = DragState::Idle
            .begin(A)
            .hover(B, Some(DropPosition::Inside))
            .begin(C);
        assert_eq!(state.dragged(), Some(C));
        assert!(state.intent().is_none());
    }
}
