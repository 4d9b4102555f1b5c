//! Outcome types for write operations against the search index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of indexing a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOutcome {
    /// The concrete index the document was written to.
    pub index: String,
    /// The document id, generated by the engine when none was supplied.
    pub id: String,
    /// True if the document is new, false if an existing one was replaced.
    pub created: bool,
}

/// Result of deleting a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub id: String,
    /// False when the document did not exist.
    pub deleted: bool,
}

/// A single operation inside a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Index (create or replace) a document. A `None` id lets the engine generate one.
    Index { id: Option<String>, source: Value },
    /// Delete a document by id.
    Delete { id: String },
}

impl BulkOperation {
    /// The id targeted by this operation, if known before execution.
    pub fn id(&self) -> Option<&str> {
        match self {
            BulkOperation::Index { id, .. } => id.as_deref(),
            BulkOperation::Delete { id } => Some(id.as_str()),
        }
    }
}

/// Result of a single item within a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemResult {
    /// The document id as reported by the engine.
    pub id: Option<String>,
    /// Whether the item succeeded.
    pub success: bool,
    /// Engine error reason if the item failed.
    pub error: Option<String>,
}

/// Summary of a bulk request containing aggregate statistics and per-item results.
///
/// Partial failures are reported here rather than failing the whole call, so callers
/// can decide how to handle them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSummary {
    /// Total number of items in the request.
    pub total: usize,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Individual results, in request order.
    pub results: Vec<BulkItemResult>,
}

impl BulkSummary {
    /// Create an empty summary (no items submitted).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a summary from per-item results.
    pub fn from_results(results: Vec<BulkItemResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Returns true if any item failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
