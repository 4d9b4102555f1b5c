//! Document service implementation.
//!
//! This module provides the main service for reading and writing documents of one
//! index. Application code creates one `DocumentService` per document type and index.
//!
//! Every operation validates its input, builds one engine request, delegates it to a
//! `SearchEngineProvider` and maps the response back to typed documents. The service
//! keeps no copy of document state between calls.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use document_index_shared::{
    BulkOperation, BulkSummary, DistanceUnit, Document, GeoPoint, SearchHit, SearchHits, SortSpec,
};

use crate::config::DocumentServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchEngineProvider;
use crate::opensearch::queries::{self, SearchBody};
use crate::types::SearchOutput;
use crate::utils::{validate_document_id, validate_name};

/// The main service for interacting with documents of one index.
///
/// This is the high-level API that application code should use. It provides input
/// validation, (de)serialization of `T`, and delegates to a `SearchEngineProvider` for
/// the actual engine requests. All operations return `SearchIndexError` for consistent
/// error handling.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use document_index_repository::{DocumentService, OpenSearchProvider};
/// use document_index_shared::RawDocument;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenSearchProvider::new("http://localhost:9200")?);
/// let service: DocumentService<RawDocument> = DocumentService::new(provider, "shops");
///
/// let shop = RawDocument::from_value(json!({ "name": "Corner shop" })).unwrap();
/// let id = service.index_one(&shop).await?;
/// let stored = service.get_by_id(&id).await?;
/// # Ok(())
/// # }
/// ```
pub struct DocumentService<T: Document> {
    provider: Arc<dyn SearchEngineProvider>,
    index: String,
    config: DocumentServiceConfig,
    _document: PhantomData<fn() -> T>,
}

impl<T: Document> DocumentService<T> {
    /// Create a new DocumentService with default configuration.
    ///
    /// The default configuration includes a batch size limit of 1000 documents and
    /// a result window of 10000 hits.
    ///
    /// # Arguments
    ///
    /// * `provider` - A shared implementation of `SearchEngineProvider` (e.g., `OpenSearchProvider`)
    /// * `index` - The index (or alias) every operation targets
    pub fn new(provider: Arc<dyn SearchEngineProvider>, index: impl Into<String>) -> Self {
        Self::with_config(provider, index, DocumentServiceConfig::default())
    }

    /// Create a new DocumentService with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchEngineProvider>,
        index: impl Into<String>,
        config: DocumentServiceConfig,
    ) -> Self {
        Self {
            provider,
            index: index.into(),
            config,
            _document: PhantomData,
        }
    }

    /// The index this service operates on.
    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn config(&self) -> &DocumentServiceConfig {
        &self.config
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    fn serialize(document: &T) -> Result<Value, SearchIndexError> {
        document
            .to_json_value()
            .map_err(|e| SearchIndexError::serialization(e.to_string()))
    }

    fn deserialize(hit: &SearchHit) -> Result<Option<T>, SearchIndexError> {
        hit.parse_source::<T>().map_err(|e| {
            SearchIndexError::parse(format!("Invalid source for document {}: {}", hit.id, e))
        })
    }

    async fn execute(&self, body: Value) -> Result<SearchOutput, SearchIndexError> {
        self.provider.search(&self.index, &body).await
    }

    /// Create the index if it does not exist.
    ///
    /// # Arguments
    ///
    /// * `settings` - Optional settings and mappings body (see `IndexSettings`)
    pub async fn ensure_index_exists(
        &self,
        settings: Option<&Value>,
    ) -> Result<(), SearchIndexError> {
        validate_name("Index name", &self.index)?;
        let created = self.provider.ensure_index(&self.index, settings).await?;
        info!(index = %self.index, created, "Index is ready");
        Ok(())
    }

    /// Index one document.
    ///
    /// The document's own id is used when present; otherwise the engine generates one.
    /// An existing document with the same id is replaced.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The id of the stored document
    /// * `Err(SearchIndexError)` - If the document cannot be serialized or indexed
    pub async fn index_one(&self, document: &T) -> Result<String, SearchIndexError> {
        if let Some(id) = document.id() {
            validate_document_id(id)?;
        }
        let source = Self::serialize(document)?;

        let outcome = self
            .provider
            .index_document(&self.index, document.id(), &source)
            .await?;

        info!(
            index = %outcome.index,
            id = %outcome.id,
            created = outcome.created,
            "Indexed document"
        );
        Ok(outcome.id)
    }

    /// Index several documents in one bulk request.
    ///
    /// Ids are taken from the documents; documents without one get an engine-generated id.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-document results; check `has_failures()` for partial failures
    /// * `Err(SearchIndexError::BatchSizeExceeded)` - If the batch exceeds the configured maximum
    /// * `Err(SearchIndexError)` - If the bulk request fails as a whole
    pub async fn index_list(&self, documents: &[T]) -> Result<BulkSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BulkSummary::empty());
        }

        self.validate_batch_size(documents.len())?;

        let mut operations = Vec::with_capacity(documents.len());
        for document in documents {
            if let Some(id) = document.id() {
                validate_document_id(id)?;
            }
            operations.push(BulkOperation::Index {
                id: document.id().map(str::to_string),
                source: Self::serialize(document)?,
            });
        }

        let summary = self.provider.bulk(&self.index, &operations).await?;

        if summary.has_failures() {
            warn!(
                index = %self.index,
                failed = summary.failed,
                total = summary.total,
                "Some documents failed to index"
            );
        } else {
            info!(index = %self.index, total = summary.total, "Indexed documents");
        }
        Ok(summary)
    }

    /// Get a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(T))` - The stored document
    /// * `Ok(None)` - If no document has this id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>, SearchIndexError> {
        validate_document_id(id)?;

        match self.provider.get_document(&self.index, id).await? {
            Some(hit) => Self::deserialize(&hit),
            None => Ok(None),
        }
    }

    /// Get several documents by id in one request.
    ///
    /// Ids that do not exist are skipped, so the result may be shorter than `ids`.
    pub async fn get_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<T>, SearchIndexError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids
            .iter()
            .map(|id| -> Result<String, SearchIndexError> {
                validate_document_id(id.as_ref())?;
                Ok(id.as_ref().to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let hits = self.provider.multi_get(&self.index, &ids).await?;

        let mut documents = Vec::with_capacity(hits.len());
        for hit in &hits {
            if let Some(document) = Self::deserialize(hit)? {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    /// Return every hit matching `query`, up to the configured result window.
    pub async fn query_all(&self, query: Value) -> Result<Vec<SearchHit>, SearchIndexError> {
        self.query_all_and_sort(query, &[]).await
    }

    /// Return every hit matching `query`, up to the configured result window, sorted by
    /// `sorts` in order.
    pub async fn query_all_and_sort(
        &self,
        query: Value,
        sorts: &[SortSpec],
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        let body = SearchBody::new(query)
            .size(self.config.max_result_window)
            .sorts(sorts)
            .build();

        Ok(self.execute(body).await?.hits.hits)
    }

    /// Run `aggregation` under `name` over the documents matching `query`.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The response `aggregations` object (empty object if the engine returned none)
    pub async fn aggregation_query(
        &self,
        query: Value,
        name: &str,
        aggregation: Value,
    ) -> Result<Value, SearchIndexError> {
        validate_name("Aggregation name", name)?;

        let body = SearchBody::new(query)
            .size(0)
            .aggregation(name, aggregation)
            .build();

        let output = self.execute(body).await?;
        Ok(output.aggregations.unwrap_or_else(|| json!({})))
    }

    /// Return one page of hits matching `query`, sorted by `sorts`.
    ///
    /// # Arguments
    ///
    /// * `query` - Query clause
    /// * `sorts` - Sort clauses, applied in order
    /// * `from` - Offset of the first hit
    /// * `size` - Page size
    ///
    /// # Returns
    ///
    /// * `Ok(SearchHits)` - The page and the total number of matches
    /// * `Err(SearchIndexError::ValidationError)` - If `from + size` exceeds the result window
    pub async fn page_query_and_sort(
        &self,
        query: Value,
        sorts: &[SortSpec],
        from: usize,
        size: usize,
    ) -> Result<SearchHits, SearchIndexError> {
        let end = from.saturating_add(size);
        if end > self.config.max_result_window {
            return Err(SearchIndexError::validation(format!(
                "Page end {} exceeds result window {}",
                end, self.config.max_result_window
            )));
        }

        let body = SearchBody::new(query)
            .from(from)
            .size(size)
            .sorts(sorts)
            .build();

        Ok(self.execute(body).await?.hits)
    }

    /// Delete a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the document was deleted
    /// * `Ok(false)` - If no document had this id
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, SearchIndexError> {
        validate_document_id(id)?;

        let outcome = self.provider.delete_document(&self.index, id).await?;
        debug!(index = %self.index, id = %id, deleted = outcome.deleted, "Delete by id");
        Ok(outcome.deleted)
    }

    /// Delete every document of the index.
    ///
    /// Ids are collected with one search (up to the result window) and deleted with bulk
    /// requests of at most `max_batch_size` operations.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If every delete succeeded (or the index was already empty)
    /// * `Ok(false)` - If any bulk item failed
    pub async fn delete_all(&self) -> Result<bool, SearchIndexError> {
        let body = SearchBody::new(queries::match_all())
            .size(self.config.max_result_window)
            .source(false)
            .build();

        let hits = self.execute(body).await?.hits.hits;
        if hits.is_empty() {
            debug!(index = %self.index, "Nothing to delete");
            return Ok(true);
        }

        let operations: Vec<BulkOperation> = hits
            .into_iter()
            .map(|hit| BulkOperation::Delete { id: hit.id })
            .collect();

        let chunk_size = self.config.max_batch_size.unwrap_or(operations.len()).max(1);
        let mut has_failures = false;
        for chunk in operations.chunks(chunk_size) {
            let summary = self.provider.bulk(&self.index, chunk).await?;
            has_failures |= summary.has_failures();
        }

        info!(
            index = %self.index,
            total = operations.len(),
            has_failures,
            "Deleted all documents"
        );
        Ok(!has_failures)
    }

    /// Merge the fields of `document` into the stored document with `id`.
    ///
    /// The document must already exist. Any failure of the engine call is logged and
    /// surfaced as `SearchIndexError::UpdateError`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the update was applied
    pub async fn update_by_id(&self, id: &str, document: &T) -> Result<bool, SearchIndexError> {
        validate_document_id(id)?;
        let doc = Self::serialize(document)?;

        self.provider
            .update_document(&self.index, id, &doc)
            .await
            .map_err(|e| {
                error!(index = %self.index, id = %id, error = %e, "Failed to update document");
                match e {
                    SearchIndexError::UpdateError(_) => e,
                    other => SearchIndexError::update(other.to_string()),
                }
            })?;

        Ok(true)
    }

    /// Search documents near a coordinate.
    ///
    /// Hits below the configured minimum score are dropped. When both `lon` and `lat`
    /// are given, hits are sorted nearest first by arc distance in kilometres and hits
    /// without a value for `geo_field` are dropped. When `distance_km` is also given,
    /// only hits within that radius are returned. Without coordinates this is a plain
    /// scored query.
    ///
    /// # Arguments
    ///
    /// * `geo_field` - A `geo_point` field
    /// * `lon` - Longitude
    /// * `lat` - Latitude
    /// * `distance_km` - Optional radius in kilometres
    /// * `query` - Query clause the hits must also match
    pub async fn list_geo_by_point(
        &self,
        geo_field: &str,
        lon: Option<f64>,
        lat: Option<f64>,
        distance_km: Option<f64>,
        query: Value,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        validate_name("Geo field", geo_field)?;

        let mut body = SearchBody::new(query)
            .min_score(self.config.geo_min_score)
            .size(self.config.max_result_window);

        if let (Some(lon), Some(lat)) = (lon, lat) {
            let point = GeoPoint::new(lat, lon);
            if !point.is_valid() {
                return Err(SearchIndexError::validation(format!(
                    "Invalid coordinate lat={}, lon={}",
                    lat, lon
                )));
            }

            let filter = match distance_km {
                Some(distance) => {
                    if !(distance.is_finite() && distance > 0.0) {
                        return Err(SearchIndexError::validation(format!(
                            "Distance must be positive, got {}",
                            distance
                        )));
                    }
                    queries::geo_distance_filter(
                        geo_field,
                        point,
                        distance,
                        DistanceUnit::Kilometers,
                    )
                }
                // Unbounded radius: only documents located somewhere
                None => queries::exists(geo_field),
            };
            body = body.post_filter(filter).sort(&SortSpec::geo_distance(
                geo_field,
                point,
                DistanceUnit::Kilometers,
            ));
        }

        Ok(self.execute(body.build()).await?.hits.hits)
    }
}
