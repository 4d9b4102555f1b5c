//! Settings read from the environment.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default search engine URL.
const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

/// Default index name.
const DEFAULT_INDEX: &str = "documents";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default bulk batch limit.
const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Default number of hits fetched by the "all" style queries.
const DEFAULT_RESULT_WINDOW: usize = 10_000;

/// Connection mode for the startup check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if the engine cannot be reached.
    FailFast,
    /// Retry every retry interval until the engine is reachable.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from its textual form.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "fail-fast" if not set or invalid.
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "fail-fast".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid SEARCH_CONNECTION_MODE, defaulting to 'fail-fast'");
                Self::FailFast
            }
        }
    }
}

/// Settings for connecting to the search engine.
#[derive(Debug, Clone)]
pub struct Settings {
    pub url: String,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    /// Bulk batch limit, 0 for no limit.
    pub max_batch_size: usize,
    pub result_window: usize,
    /// Fields mapped as `geo_point` when the index is created.
    pub geo_fields: Vec<String>,
    /// Fields mapped as `keyword` when the index is created.
    pub keyword_fields: Vec<String>,
}

/// Split a comma-separated field list, dropping blanks.
fn field_list(value: Option<String>) -> Vec<String> {
    value
        .map(|fields| {
            fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_URL`: Search engine URL (default: http://localhost:9200)
    /// - `SEARCH_INDEX`: Index name (default: documents)
    /// - `SEARCH_USERNAME` / `SEARCH_PASSWORD`: Basic auth credentials (optional)
    /// - `SEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: fail-fast)
    /// - `SEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `SEARCH_MAX_BATCH_SIZE`: Bulk batch limit, 0 for no limit (default: 1000)
    /// - `SEARCH_RESULT_WINDOW`: Hits fetched by the "all" style queries (default: 10000)
    /// - `SEARCH_GEO_FIELDS`: Comma-separated `geo_point` fields for index creation
    /// - `SEARCH_KEYWORD_FIELDS`: Comma-separated `keyword` fields for index creation
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through a lookup function, falling back to defaults for missing
    /// or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let retry_interval = lookup("SEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        let max_batch_size = match lookup("SEARCH_MAX_BATCH_SIZE") {
            Some(value) => value.parse::<usize>().unwrap_or_else(|_| {
                warn!(value = %value, "Invalid SEARCH_MAX_BATCH_SIZE, using default");
                DEFAULT_MAX_BATCH_SIZE
            }),
            None => DEFAULT_MAX_BATCH_SIZE,
        };

        let result_window = match lookup("SEARCH_RESULT_WINDOW") {
            Some(value) => match value.parse::<usize>() {
                Ok(window) if window > 0 => window,
                _ => {
                    warn!(value = %value, "Invalid SEARCH_RESULT_WINDOW, using default");
                    DEFAULT_RESULT_WINDOW
                }
            },
            None => DEFAULT_RESULT_WINDOW,
        };

        Self {
            url: lookup("SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            index: lookup("SEARCH_INDEX").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            username: lookup("SEARCH_USERNAME"),
            password: lookup("SEARCH_PASSWORD"),
            connection_mode: ConnectionMode::parse(lookup("SEARCH_CONNECTION_MODE")),
            retry_interval: Duration::from_secs(retry_interval),
            max_batch_size,
            result_window,
            geo_fields: field_list(lookup("SEARCH_GEO_FIELDS")),
            keyword_fields: field_list(lookup("SEARCH_KEYWORD_FIELDS")),
        }
    }
}
