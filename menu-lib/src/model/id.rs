//! MenuId newtype

use serde::Deserialize;
use serde::Serialize;

/// Opaque identifier of a menu item.
///
/// Ids are assigned by the backend and are stable across tree rebuilds, so
/// they are safe to keep in long-lived state such as the expanded set.
///
/// # Examples
///
/// ```
/// use menu_lib::model::MenuId;
///
/// let id = MenuId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(i64);

impl MenuId {
    /// Creates an id from its raw value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for MenuId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<i32> for MenuId {
    fn from(raw: i32) -> Self {
        Self(i64::from(raw))
    }
}

impl std::fmt::Display for MenuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MenuId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}
