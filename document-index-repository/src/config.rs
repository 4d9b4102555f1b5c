//! Configuration types for the DocumentService.

/// Default maximum number of hits fetched by the "query all" style operations.
pub const DEFAULT_MAX_RESULT_WINDOW: usize = 10_000;

/// Default minimum relevance score for geo searches.
pub const DEFAULT_GEO_MIN_SCORE: f64 = 0.1;

/// Configuration for the DocumentService.
///
/// This struct controls batch limits and result windows so callers cannot
/// accidentally send overly large requests to the search engine.
#[derive(Debug, Clone)]
pub struct DocumentServiceConfig {
    /// Maximum number of documents allowed in a single bulk request.
    ///
    /// Set to `None` to disable the limit (not recommended for production).
    /// Defaults to 1000 if not specified.
    pub max_batch_size: Option<usize>,

    /// Number of hits requested by `query_all`, `query_all_and_sort`,
    /// `list_geo_by_point` and `delete_all`, and the upper bound for `from + size`
    /// in paginated queries. Must not exceed the index's `max_result_window`.
    pub max_result_window: usize,

    /// Minimum relevance score applied to geo searches.
    pub geo_min_score: f64,
}

impl Default for DocumentServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
            geo_min_score: DEFAULT_GEO_MIN_SCORE,
        }
    }
}

impl DocumentServiceConfig {
    /// Create a config with no batch size limit.
    ///
    /// # Warning
    ///
    /// Use with caution. Removing batch size limits can lead to memory issues
    /// and timeouts when processing very large batches. Not recommended for production.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    ///
    /// # Arguments
    ///
    /// * `max_batch_size` - Maximum number of documents allowed in a single bulk request
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    /// Override the result window.
    pub fn result_window(mut self, max_result_window: usize) -> Self {
        self.max_result_window = max_result_window;
        self
    }
}
