//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// Result from a ticker/symbol search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Symbol/ticker (e.g., "AAPL", "BRK.B")
    pub symbol: String,

    /// Company description (e.g., "APPLE INC")
    pub description: String,

    /// Security type (e.g., "Common Stock")
    #[serde(rename = "type")]
    pub security_type: String,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(
        symbol: impl Into<String>,
        description: impl Into<String>,
        security_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            description: description.into(),
            security_type: security_type.into(),
        }
    }
}
