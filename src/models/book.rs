//! Book (catalog entry) model and list-response normalization

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog entry. Identity is the `id`; everything beyond the
/// availability flag is descriptive and opaque to this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub available: bool,
    /// Descriptive fields this layer does not interpret, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// PATCH body for the availability update
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AvailabilityUpdate {
    pub available: bool,
}

/// Extract the book sequence from a `/books` response body.
///
/// The server wraps the list as `{"books": [...]}`. A body whose `books`
/// member is missing or not a sequence yields an empty list rather than
/// a failure; a sequence whose entries do not decode as books is a
/// decode failure.
pub fn books_from_body(mut body: Value) -> Result<Vec<Book>, serde_json::Error> {
    match body.get_mut("books") {
        Some(books) if books.is_array() => serde_json::from_value(books.take()),
        _ => Ok(Vec::new()),
    }
}
