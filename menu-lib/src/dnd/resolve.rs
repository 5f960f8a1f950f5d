//! Drop position resolution from pointer geometry

use serde::Deserialize;
use serde::Serialize;

use crate::model::MenuId;

/// Fraction of the row height that counts as "before" (top band).
pub const BEFORE_BAND: f32 = 0.3;

/// Fraction of the row height below which the pointer is still "inside".
/// The remaining bottom band counts as "after".
pub const AFTER_BAND: f32 = 0.7;

/// Where a dragged node lands relative to the hovered target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    /// Sibling placed directly before the target.
    Before,
    /// Sibling placed directly after the target.
    After,
    /// Last child of the target.
    Inside,
}

impl DropPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Inside => "inside",
        }
    }
}

impl std::fmt::Display for DropPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown drop position name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown drop position '{0}', expected before, after or inside")]
pub struct ParseDropPositionError(pub String);

impl std::str::FromStr for DropPosition {
    type Err = ParseDropPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "inside" => Ok(Self::Inside),
            other => Err(ParseDropPositionError(other.to_string())),
        }
    }
}

/// Classifies a pointer offset within a row.
///
/// The row is split into a 30% top band (`Before`), a 40% middle band
/// (`Inside`) and a 30% bottom band (`After`). Offsets above or below the row
/// fall into the outer bands.
///
/// Returns `None` when the row height is not a positive finite number or the
/// offset is NaN.
///
/// # Examples
///
/// ```
/// use menu_lib::dnd::{resolve_drop_position, DropPosition};
///
/// assert_eq!(resolve_drop_position(5.0, 40.0), Some(DropPosition::Before));
/// assert_eq!(resolve_drop_position(20.0, 40.0), Some(DropPosition::Inside));
/// assert_eq!(resolve_drop_position(38.0, 40.0), Some(DropPosition::After));
/// assert_eq!(resolve_drop_position(5.0, 0.0), None);
/// ```
pub fn resolve_drop_position(offset_y: f32, row_height: f32) -> Option<DropPosition> {
    if !row_height.is_finite() || row_height <= 0.0 || offset_y.is_nan() {
        return None;
    }

    if offset_y < row_height * BEFORE_BAND {
        Some(DropPosition::Before)
    } else if offset_y > row_height * AFTER_BAND {
        Some(DropPosition::After)
    } else {
        Some(DropPosition::Inside)
    }
}

/// Result of a hover event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    /// Resolved position, `None` when no drop is possible here.
    pub position: Option<DropPosition>,
    /// Whether the position differs from the previous hover event.
    pub changed: bool,
}

/// Per-gesture drop resolver.
///
/// Stateless apart from the last resolved target and position, which only
/// serves to tell the caller whether the drop indicator needs redrawing.
#[derive(Debug, Clone, Default)]
pub struct DropResolver {
    last: Option<(MenuId, DropPosition)>,
}

impl DropResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the drop position for `dragged` hovering over `hovered`.
    ///
    /// Hovering a node over itself never yields a position.
    pub fn hover(
        &mut self,
        dragged: MenuId,
        hovered: MenuId,
        offset_y: f32,
        row_height: f32,
    ) -> Hover {
        let position = if dragged == hovered {
            None
        } else {
            resolve_drop_position(offset_y, row_height)
        };

        let current = position.map(|position| (hovered, position));
        let changed = current != self.last;
        if changed {
            log::trace!("Drop position over {} is now {:?}", hovered, position);
        }
        self.last = current;

        Hover { position, changed }
    }

    /// Returns the last resolved target and position.
    pub fn last(&self) -> Option<(MenuId, DropPosition)> {
        self.last
    }

    /// Forgets the last position, e.g. when the pointer leaves a row.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
