//! Search engine provider trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use document_index_shared::{BulkOperation, BulkSummary, DeleteOutcome, IndexOutcome, SearchHit};

use crate::errors::SearchIndexError;
use crate::types::SearchOutput;

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// Every method issues exactly one remote request against the named index and maps
/// the engine response into crate types. Implementations are injected into
/// `DocumentService` so tests can substitute a mock.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchEngineProvider: Send + Sync {
    /// Create the index with the given settings and mappings if it does not exist.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index was created
    /// * `Ok(false)` - If the index already existed
    /// * `Err(SearchIndexError)` - If the check or creation fails
    async fn ensure_index(
        &self,
        index: &str,
        settings: Option<&Value>,
    ) -> Result<bool, SearchIndexError>;

    /// Index (create or replace) a document.
    ///
    /// When `id` is `None` the engine generates one; it is returned in the outcome.
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Value,
    ) -> Result<IndexOutcome, SearchIndexError>;

    /// Fetch a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(hit))` - The stored document
    /// * `Ok(None)` - If the document does not exist
    async fn get_document(&self, index: &str, id: &str)
        -> Result<Option<SearchHit>, SearchIndexError>;

    /// Fetch several documents in one request.
    ///
    /// Documents that do not exist are omitted. Found documents keep request order.
    async fn multi_get(&self, index: &str, ids: &[String])
        -> Result<Vec<SearchHit>, SearchIndexError>;

    /// Submit a batch of index/delete operations in one request.
    ///
    /// Item-level failures are reported in the summary; only a failure of the request
    /// as a whole is returned as an error.
    async fn bulk(
        &self,
        index: &str,
        operations: &[BulkOperation],
    ) -> Result<BulkSummary, SearchIndexError>;

    /// Delete a document by id. A missing document is not an error.
    async fn delete_document(&self, index: &str, id: &str)
        -> Result<DeleteOutcome, SearchIndexError>;

    /// Merge `doc` into an existing document.
    ///
    /// The document must exist (this is not an upsert).
    async fn update_document(
        &self,
        index: &str,
        id: &str,
        doc: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Execute a search request body against the index.
    async fn search(&self, index: &str, body: &Value) -> Result<SearchOutput, SearchIndexError>;
}
