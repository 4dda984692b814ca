//! Symbol lookup models for free-text search.

use serde::{Deserialize, Serialize};

use super::data_source::DataSource;

/// Single entry in a lookup result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupItem {
    /// Canonical symbol.
    pub symbol: String,

    /// Display name.
    pub name: String,

    /// Trading currency, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Adapter that produced the entry.
    pub data_source: DataSource,
}

/// Result of a free-text symbol search.
///
/// An empty `items` list means nothing matched; lookups never fail for
/// "not found".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub items: Vec<LookupItem>,
}

impl LookupResponse {
    pub fn new(items: Vec<LookupItem>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup_is_empty() {
        let response = LookupResponse::default();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_lookup_item_serialization() {
        let item = LookupItem {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            currency: Some("USD".to_string()),
            data_source: DataSource::Yahoo,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"YAHOO\""));
        assert!(json.contains("Apple Inc."));
    }
}
