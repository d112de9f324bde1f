//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Free-text search parameter (`?search=`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}
