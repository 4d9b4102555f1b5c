//! OpenSearch implementation of the search engine provider.
//!
//! This module provides a concrete implementation of `SearchEngineProvider`
//! using OpenSearch as the backend, plus the query builders and response
//! parsers it relies on.

mod index_settings;
mod provider;
pub mod queries;
pub mod response;

pub use index_settings::IndexSettings;
pub use provider::OpenSearchProvider;
pub use queries::SearchBody;
