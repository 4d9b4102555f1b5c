//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchEngineProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, DeleteParts, GetParts, IndexParts, MgetParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use document_index_shared::{BulkOperation, BulkSummary, DeleteOutcome, IndexOutcome, SearchHit};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchEngineProvider;
use crate::opensearch::queries;
use crate::opensearch::response::{
    parse_bulk_response, parse_delete_response, parse_get_response, parse_index_response,
    parse_mget_response, parse_search_response,
};
use crate::types::SearchOutput;

/// OpenSearch provider implementation.
///
/// The provider only holds the server location. Each operation builds a fresh client,
/// issues one request and drops the client before returning, so no connection state
/// is shared between calls.
///
/// # Example
///
/// ```ignore
/// use document_index_repository::{OpenSearchProvider, SearchEngineProvider};
/// use serde_json::json;
///
/// let provider = OpenSearchProvider::new("http://localhost:9200")?;
/// let outcome = provider
///     .index_document("shops", None, &json!({ "name": "Corner shop" }))
///     .await?;
/// println!("generated id: {}", outcome.id);
/// ```
pub struct OpenSearchProvider {
    url: Url,
    credentials: Option<(String, String)>,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL cannot be resolved
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self {
            url: parsed_url,
            credentials: None,
        })
    }

    /// Use HTTP basic authentication for every request.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Build a client for a single operation.
    fn connect(&self) -> Result<OpenSearch, SearchIndexError> {
        let conn_pool = SingleNodeConnectionPool::new(self.url.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = &self.credentials {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(OpenSearch::new(transport))
    }
}

/// Read a JSON body from a successful response, or turn a non-success status into
/// the operation's error.
async fn read_json(
    response: Response,
    operation: &str,
    make_error: fn(String) -> SearchIndexError,
) -> Result<Value, SearchIndexError> {
    let status = response.status_code();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, operation, "Request failed");
        return Err(make_error(format!(
            "{} failed with status {}: {}",
            operation, status, error_body
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| SearchIndexError::parse(e.to_string()))
}

#[async_trait]
impl SearchEngineProvider for OpenSearchProvider {
    async fn ensure_index(
        &self,
        index: &str,
        settings: Option<&Value>,
    ) -> Result<bool, SearchIndexError> {
        let client = self.connect()?;

        let exists = client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(false);
        }

        let body = settings.cloned().unwrap_or_else(|| json!({}));
        let response = client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another writer created the index between the two requests
            if error_body.contains("resource_already_exists_exception") {
                warn!(index = %index, "Index was created concurrently");
                return Ok(false);
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(true)
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Value,
    ) -> Result<IndexOutcome, SearchIndexError> {
        let client = self.connect()?;

        let parts = match id {
            Some(id) => IndexParts::IndexId(index, id),
            None => IndexParts::Index(index),
        };
        let response = client
            .index(parts)
            .body(source)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = read_json(response, "Index", SearchIndexError::IndexError).await?;
        parse_index_response(&body)
    }

    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<SearchHit>, SearchIndexError> {
        let client = self.connect()?;

        let response = client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        // 404 covers both a missing document and a missing index
        if response.status_code().as_u16() == 404 {
            debug!(index = %index, id = %id, "Document not found");
            return Ok(None);
        }

        let body = read_json(response, "Get", SearchIndexError::GetError).await?;
        parse_get_response(&body)
    }

    async fn multi_get(
        &self,
        index: &str,
        ids: &[String],
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        let client = self.connect()?;

        let response = client
            .mget(MgetParts::Index(index))
            .body(json!({ "ids": ids }))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = read_json(response, "Multi-get", SearchIndexError::GetError).await?;
        parse_mget_response(&body)
    }

    async fn bulk(
        &self,
        index: &str,
        operations: &[BulkOperation],
    ) -> Result<BulkSummary, SearchIndexError> {
        let client = self.connect()?;

        let body: Vec<JsonBody<Value>> = queries::bulk_lines(operations)
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = read_json(response, "Bulk", SearchIndexError::BulkIndexError).await?;
        let summary = parse_bulk_response(&body)?;

        if summary.has_failures() {
            warn!(
                index = %index,
                total = summary.total,
                failed = summary.failed,
                "Bulk request had failures"
            );
        } else {
            debug!(index = %index, total = summary.total, "Bulk request completed");
        }
        Ok(summary)
    }

    async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DeleteOutcome, SearchIndexError> {
        let client = self.connect()?;

        let response = client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        // 404 is acceptable - document may not exist
        if response.status_code().as_u16() == 404 {
            debug!(index = %index, id = %id, "Document to delete not found");
            return Ok(DeleteOutcome {
                id: id.to_string(),
                deleted: false,
            });
        }

        let body = read_json(response, "Delete", SearchIndexError::DeleteError).await?;
        let outcome = parse_delete_response(&body)?;

        debug!(index = %index, id = %id, deleted = outcome.deleted, "Document deleted");
        Ok(outcome)
    }

    async fn update_document(
        &self,
        index: &str,
        id: &str,
        doc: &Value,
    ) -> Result<(), SearchIndexError> {
        let client = self.connect()?;

        let response = client
            .update(UpdateParts::IndexId(index, id))
            .body(json!({ "doc": doc }))
            .send()
            .await
            .map_err(|e| {
                error!(index = %index, id = %id, error = %e, "Update request could not be sent");
                SearchIndexError::update(e.to_string())
            })?;

        read_json(response, "Update", SearchIndexError::UpdateError).await?;

        debug!(index = %index, id = %id, "Document updated");
        Ok(())
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchOutput, SearchIndexError> {
        let client = self.connect()?;

        let response = client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = read_json(response, "Search", SearchIndexError::SearchError).await?;
        let output = parse_search_response(&body)?;

        debug!(
            index = %index,
            total = output.hits.total,
            returned = output.hits.hits.len(),
            took_ms = output.took_ms,
            "Search completed"
        );
        Ok(output)
    }
}
