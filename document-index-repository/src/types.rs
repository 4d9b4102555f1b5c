//! Response types produced by the search engine provider.

use document_index_shared::SearchHits;
use serde_json::Value;

/// Parsed result of a search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutput {
    /// The matching hits and total count.
    pub hits: SearchHits,
    /// The `aggregations` object, when the request asked for any.
    pub aggregations: Option<Value>,
    /// Time the engine spent executing the search, in milliseconds.
    pub took_ms: u64,
}
