//! Response envelope and wire records

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::model::Menu;

/// Envelope wrapped around every response body of the menu API.
///
/// # Example
///
/// ```
/// use menu_lib::response::ApiResponse;
///
/// let body = r#"{"status": 200, "message": "ok", "data": 5}"#;
/// let response: ApiResponse<u32> = serde_json::from_str(body).unwrap();
/// assert_eq!(response.into_data().unwrap(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP-like status code echoed by the server.
    #[serde(default)]
    pub status: u16,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Payload. Absent on errors and on some deletes.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Error detail, set on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            message: "Success".to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// Returns `true` if the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (self.status == 0 || (200..300).contains(&self.status))
    }

    /// Unwraps the payload, turning error envelopes into [`ApiError::Http`].
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(self.into_error());
        }
        self.data
            .ok_or_else(|| ApiError::parse("Response envelope has no data"))
    }

    /// Converts an error envelope into an [`ApiError`].
    pub fn into_error(self) -> ApiError {
        let status = if self.status == 0 { 500 } else { self.status };
        match self.error {
            Some(detail) => ApiError::http_with_detail(status, self.message, detail),
            None => ApiError::http(status, self.message),
        }
    }
}

/// A menu record as returned by the server.
///
/// Listing endpoints may return records with their children already nested;
/// [`flatten_records`] turns those back into the flat form the tree model
/// works from.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuRecord {
    #[serde(flatten)]
    pub menu: Menu,
    #[serde(default)]
    pub children: Option<Vec<MenuRecord>>,
}

/// Flattens possibly nested records into a list with each id once.
pub fn flatten_records(records: Vec<MenuRecord>) -> Vec<Menu> {
    fn walk(records: Vec<MenuRecord>, seen: &mut HashSet<crate::model::MenuId>, out: &mut Vec<Menu>) {
        for record in records {
            if seen.insert(record.menu.id) {
                out.push(record.menu);
            }
            if let Some(children) = record.children {
                walk(children, seen, out);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk(records, &mut seen, &mut out);
    out
}
