//! Dependency initialization and wiring for the document index binary.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::settings::{ConnectionMode, Settings};
use crate::AppError;
use document_index_repository::{
    DocumentService, DocumentServiceConfig, IndexSettings, OpenSearchProvider, SearchEngineProvider,
};
use document_index_shared::RawDocument;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The document service bound to the configured index.
    pub service: DocumentService<RawDocument>,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// Creates the OpenSearch provider and hands it to [`Dependencies::with_provider`].
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If initialization fails (only in fail-fast mode)
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            url = %settings.url,
            index = %settings.index,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let mut provider = OpenSearchProvider::new(&settings.url)
            .map_err(|e| AppError::config(format!("Failed to create provider: {}", e)))?;
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            provider = provider.with_basic_auth(username, password);
        }

        Self::with_provider(Arc::new(provider), settings).await
    }

    /// Build the service over `provider` and make sure the index exists, creating it
    /// with the configured `geo_point` and `keyword` mappings if missing.
    ///
    /// The index check is the first request to reach the engine, so it doubles as the
    /// connection check.
    pub async fn with_provider(
        provider: Arc<dyn SearchEngineProvider>,
        settings: &Settings,
    ) -> Result<Self, AppError> {
        let config = match settings.max_batch_size {
            0 => DocumentServiceConfig::unlimited(),
            max => DocumentServiceConfig::with_max_batch_size(max),
        }
        .result_window(settings.result_window);
        let service = DocumentService::with_config(provider, settings.index.clone(), config);

        let index_settings = settings
            .keyword_fields
            .iter()
            .fold(IndexSettings::default(), |s, field| s.with_keyword(field));
        let index_settings = settings
            .geo_fields
            .iter()
            .fold(index_settings, |s, field| s.with_geo_point(field))
            .to_json();

        Self::ensure_index(
            &service,
            &index_settings,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!(index = %settings.index, "Search engine connection established");

        Ok(Self { service })
    }

    /// Ensure the index exists with retry logic based on connection mode.
    async fn ensure_index(
        service: &DocumentService<RawDocument>,
        index_settings: &serde_json::Value,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<(), AppError> {
        loop {
            match service.ensure_index_exists(Some(index_settings)).await {
                Ok(()) => return Ok(()),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(AppError::config(format!(
                            "Failed to reach search engine: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            index = %service.index(),
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to reach search engine, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}
